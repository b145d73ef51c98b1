//! Unit-of-work abstraction for the borrow ledger.
//!
//! Borrowing, returning and guarded deletes read and write several rows that
//! must change together. Each of those operations opens one [`LedgerTx`],
//! performs its checks and writes through it, and commits. A `LedgerTx` that
//! is dropped without `commit` discards everything it wrote.
//!
//! Lookups made through a `LedgerTx` are stable for the lifetime of the unit
//! of work: the PostgreSQL implementation takes `FOR UPDATE` row locks, so a
//! concurrent unit of work touching the same reader, book or borrow record
//! waits until this one commits or rolls back.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BorrowRecord, Reader},
};

/// Which side of the ledger an active-borrow count is taken on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBorrowFilter {
    Reader(i32),
    Book(i32),
}

/// Operations available inside one unit of work
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerTx: Send {
    async fn fetch_reader(&mut self, id: i32) -> AppResult<Option<Reader>>;

    async fn fetch_book(&mut self, id: i32) -> AppResult<Option<Book>>;

    async fn fetch_borrow(&mut self, id: i32) -> AppResult<Option<BorrowRecord>>;

    /// Existence check that takes no row lock
    async fn reader_exists(&mut self, id: i32) -> AppResult<bool>;

    /// Count borrow records with no return date
    async fn count_active_borrows(&mut self, filter: ActiveBorrowFilter) -> AppResult<i64>;

    /// Active borrow records of a reader, in insertion order
    async fn active_borrows_for_reader(&mut self, reader_id: i32) -> AppResult<Vec<BorrowRecord>>;

    /// Insert an active borrow record stamped with the current server time
    async fn insert_borrow(&mut self, reader_id: i32, book_id: i32) -> AppResult<BorrowRecord>;

    /// Stamp the return date on an active record
    async fn mark_returned(&mut self, borrow_id: i32) -> AppResult<BorrowRecord>;

    /// Add `delta` to a book's copies count and return the updated book
    async fn adjust_copies(&mut self, book_id: i32, delta: i32) -> AppResult<Book>;

    /// Delete a book together with its (returned) borrow history
    async fn delete_book(&mut self, id: i32) -> AppResult<()>;

    /// Delete a reader together with their (returned) borrow history
    async fn delete_reader(&mut self, id: i32) -> AppResult<()>;

    async fn commit(&mut self) -> AppResult<()>;
}

/// Opens units of work against the backing store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>>;
}
