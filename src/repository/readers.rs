//! Readers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        reader::{CreateReader, UpdateReader},
        PageQuery, Reader,
    },
};

#[derive(Clone)]
pub struct ReadersRepository {
    pool: Pool<Postgres>,
}

impl ReadersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reader by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ReaderNotFound(id))
    }

    /// List readers alphabetically
    pub async fn list(&self, query: &PageQuery) -> AppResult<(Vec<Reader>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readers")
            .fetch_one(&self.pool)
            .await?;

        let readers = sqlx::query_as::<_, Reader>(
            "SELECT * FROM readers ORDER BY name ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((readers, total))
    }

    /// Create a new reader
    pub async fn create(&self, reader: &CreateReader) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>(
            "INSERT INTO readers (name, email, note) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&reader.name)
        .bind(&reader.email)
        .bind(&reader.note)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_write)
    }

    /// Apply a partial update in place
    pub async fn update(&self, id: i32, update: &UpdateReader) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>(
            r#"
            UPDATE readers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                note = CASE WHEN $4 THEN $5 ELSE note END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.note.is_some())
        .bind(update.note.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::ReaderNotFound(id))
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE email = $1 AND id != $2)")
                .bind(email)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }
}
