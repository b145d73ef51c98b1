//! PostgreSQL implementation of the borrow ledger

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRecord, Reader},
};

use super::{
    ledger::{ActiveBorrowFilter, LedgerStore, LedgerTx},
    Repository,
};

/// One database transaction. Rolled back on drop unless committed.
pub struct PgLedgerTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgLedgerTx {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx: Some(tx) }
    }

    fn conn(&mut self) -> AppResult<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::Internal("Ledger transaction already committed".to_string()))
    }
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn fetch_reader(&mut self, id: i32) -> AppResult<Option<Reader>> {
        let reader = sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(self.conn()?)
            .await?;
        Ok(reader)
    }

    async fn fetch_book(&mut self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(self.conn()?)
            .await?;
        Ok(book)
    }

    async fn fetch_borrow(&mut self, id: i32) -> AppResult<Option<BorrowRecord>> {
        let borrow = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await?;
        Ok(borrow)
    }

    async fn reader_exists(&mut self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE id = $1)")
            .bind(id)
            .fetch_one(self.conn()?)
            .await?;
        Ok(exists)
    }

    async fn count_active_borrows(&mut self, filter: ActiveBorrowFilter) -> AppResult<i64> {
        let (sql, id) = match filter {
            ActiveBorrowFilter::Reader(id) => (
                "SELECT COUNT(*) FROM borrow_records WHERE reader_id = $1 AND return_date IS NULL",
                id,
            ),
            ActiveBorrowFilter::Book(id) => (
                "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND return_date IS NULL",
                id,
            ),
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(self.conn()?)
            .await?;
        Ok(count)
    }

    async fn active_borrows_for_reader(&mut self, reader_id: i32) -> AppResult<Vec<BorrowRecord>> {
        let borrows = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT * FROM borrow_records
            WHERE reader_id = $1 AND return_date IS NULL
            ORDER BY id
            "#,
        )
        .bind(reader_id)
        .fetch_all(self.conn()?)
        .await?;
        Ok(borrows)
    }

    async fn insert_borrow(&mut self, reader_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let borrow = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (reader_id, book_id, borrow_date)
            VALUES ($1, $2, NOW())
            RETURNING *
            "#,
        )
        .bind(reader_id)
        .bind(book_id)
        .fetch_one(self.conn()?)
        .await?;
        Ok(borrow)
    }

    async fn mark_returned(&mut self, borrow_id: i32) -> AppResult<BorrowRecord> {
        // The return date is written at most once
        sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records SET return_date = NOW()
            WHERE id = $1 AND return_date IS NULL
            RETURNING *
            "#,
        )
        .bind(borrow_id)
        .fetch_optional(self.conn()?)
        .await?
        .ok_or(AppError::AlreadyReturned(borrow_id))
    }

    async fn adjust_copies(&mut self, book_id: i32, delta: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET copies_count = copies_count + $2 WHERE id = $1 RETURNING *",
        )
        .bind(book_id)
        .bind(delta)
        .fetch_optional(self.conn()?)
        .await?
        .ok_or(AppError::BookNotFound(book_id))
    }

    async fn delete_book(&mut self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(self.conn()?)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(id));
        }
        Ok(())
    }

    async fn delete_reader(&mut self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM readers WHERE id = $1")
            .bind(id)
            .execute(self.conn()?)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ReaderNotFound(id));
        }
        Ok(())
    }

    async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::Internal("Ledger transaction already committed".to_string()))?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for Repository {
    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgLedgerTx::new(tx)))
    }
}
