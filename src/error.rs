//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes reported to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchReader = 4,
    NoSuchBook = 5,
    NoSuchBorrow = 6,
    NoSuchLibrarian = 7,
    NoCopiesAvailable = 8,
    BorrowLimitExceeded = 9,
    AlreadyReturned = 10,
    HasActiveBorrowings = 11,
    DuplicateEmail = 12,
    DuplicateIsbn = 13,
    BadValue = 14,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Reader with id {0} not found")]
    ReaderNotFound(i32),

    #[error("Book with id {0} not found")]
    BookNotFound(i32),

    #[error("Borrow record with id {0} not found")]
    BorrowRecordNotFound(i32),

    #[error("Librarian with id {0} not found")]
    LibrarianNotFound(i32),

    #[error("No available copies of book {0} to borrow")]
    NoCopiesAvailable(i32),

    #[error("Reader {reader_id} already has {limit} borrowed books")]
    BorrowLimitExceeded { reader_id: i32, limit: i64 },

    #[error("Borrow record {0} is already returned")]
    AlreadyReturned(i32),

    #[error("{0} has active borrowings")]
    HasActiveBorrowings(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("ISBN already registered: {0}")]
    DuplicateIsbn(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map unique-constraint violations raised by PostgreSQL to typed conflicts
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.constraint() {
                Some("books_isbn_key") => {
                    return AppError::DuplicateIsbn("ISBN already registered".to_string())
                }
                Some("readers_email_key") | Some("librarians_email_key") => {
                    return AppError::DuplicateEmail("Email already registered".to_string())
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }

    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::ReaderNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchReader),
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::BorrowRecordNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBorrow),
            AppError::LibrarianNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchLibrarian),
            AppError::NoCopiesAvailable(_) => (StatusCode::CONFLICT, ErrorCode::NoCopiesAvailable),
            AppError::BorrowLimitExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BorrowLimitExceeded)
            }
            AppError::AlreadyReturned(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyReturned),
            AppError::HasActiveBorrowings(_) => {
                (StatusCode::CONFLICT, ErrorCode::HasActiveBorrowings)
            }
            AppError::DuplicateEmail(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateEmail),
            AppError::DuplicateIsbn(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateIsbn),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Authentication(msg) | AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
