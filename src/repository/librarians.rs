//! Librarian accounts repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Librarian,
};

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Postgres>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::LibrarianNotFound(id))
    }

    /// Get librarian by email (login identity)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(librarian)
    }

    /// Create a librarian. `password_hash` must already be hashed.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>(
            "INSERT INTO librarians (name, email, password) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_write)
    }
}
