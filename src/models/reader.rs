//! Reader (library patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub const NOTE_MAX_LEN: usize = 500;

/// Reader model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reader {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub note: Option<String>,
}

/// Create reader request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReader {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Update reader request. `note: null` clears the note.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReader {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub note: Option<Option<String>>,
}

impl UpdateReader {
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if let Some(Some(note)) = &self.note {
            if note.chars().count() > NOTE_MAX_LEN {
                return Err(AppError::Validation(
                    "Note must be at most 500 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}
