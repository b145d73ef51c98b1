//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::borrow::{ActiveBorrows, BorrowRecord, BorrowRequest},
};

use super::AuthenticatedUser;

/// Lend a book to a reader
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecord),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Reader or book not found"),
        (status = 409, description = "No copies available"),
        (status = 422, description = "Reader already holds the maximum number of books")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    request.validate()?;

    let borrow = state
        .services
        .borrows
        .borrow_book(request.book_id, request.reader_id)
        .await?;

    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecord),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowRecord>> {
    let borrow = state.services.borrows.return_book(borrow_id).await?;
    Ok(Json(borrow))
}

/// Books a reader currently holds
#[utoipa::path(
    get,
    path = "/readers/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Active borrow records", body = ActiveBorrows),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn reader_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(reader_id): Path<i32>,
) -> AppResult<Json<ActiveBorrows>> {
    let borrows = state.services.borrows.active_borrows(reader_id).await?;
    Ok(Json(borrows))
}
