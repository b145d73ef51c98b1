//! Reader management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        reader::{CreateReader, Reader, UpdateReader},
        PageQuery,
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List readers alphabetically
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of readers", body = PaginatedResponse<Reader>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_readers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Reader>>> {
    let (readers, total) = state.services.readers.list_readers(&query).await?;
    Ok(Json(PaginatedResponse::new(readers, total, &query)))
}

/// Get reader by ID
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn get_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_reader(id).await?;
    Ok(Json(reader))
}

/// Register a reader
#[utoipa::path(
    post,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = CreateReader,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(reader): Json<CreateReader>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    let created = state.services.readers.create_reader(reader).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a reader
#[utoipa::path(
    put,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    request_body = UpdateReader,
    responses(
        (status = 200, description = "Reader updated", body = Reader),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Reader not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateReader>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.update_reader(id, update).await?;
    Ok(Json(reader))
}

/// Delete a reader who holds no books
#[utoipa::path(
    delete,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 404, description = "Reader not found"),
        (status = 409, description = "Reader has active borrowings")
    )
)]
pub async fn delete_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.borrows.delete_reader(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
