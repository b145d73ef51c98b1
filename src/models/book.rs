//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub const ISBN_MAX_LEN: usize = 20;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    /// Copies currently on the shelf (never negative)
    pub copies_count: i32,
}

fn default_copies() -> i32 {
    1
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    pub publication_year: Option<i32>,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    #[serde(default = "default_copies")]
    #[validate(range(min = 0, message = "Copies count cannot be negative"))]
    pub copies_count: i32,
}

/// Update book request.
///
/// Absent fields are left untouched. `publication_year` and `isbn` accept an
/// explicit `null` to clear the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Option<String>>,
    #[validate(range(min = 0, message = "Copies count cannot be negative"))]
    pub copies_count: Option<i32>,
}

impl UpdateBook {
    /// Field checks `validator` cannot express on nested options
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if let Some(Some(isbn)) = &self.isbn {
            if isbn.chars().count() > ISBN_MAX_LEN {
                return Err(AppError::Validation(
                    "ISBN must be at most 20 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}
