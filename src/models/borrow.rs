//! Borrow record (ledger entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Maximum number of books a reader may hold at once
pub const MAX_ACTIVE_BORROWS: i64 = 3;

/// Borrow record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub reader_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    /// `None` while the book is still out
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Borrow book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    #[validate(range(min = 1, message = "book_id must be positive"))]
    pub book_id: i32,
    #[validate(range(min = 1, message = "reader_id must be positive"))]
    pub reader_id: i32,
}

/// Books currently held by a reader
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActiveBorrows {
    pub borrowed_books: Vec<BorrowRecord>,
}
