//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod ledger;
pub mod librarians;
#[cfg(test)]
pub mod memory;
pub mod readers;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use ledger::{ActiveBorrowFilter, LedgerStore, LedgerTx};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub readers: readers::ReadersRepository,
    pub librarians: librarians::LibrariansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            readers: readers::ReadersRepository::new(pool.clone()),
            librarians: librarians::LibrariansRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
