//! In-memory ledger used by unit tests.
//!
//! A unit of work holds the store lock for its whole lifetime and writes to a
//! private copy of the state, published only on commit. That makes every unit
//! of work serializable and all-or-nothing.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRecord, Reader},
};

use super::ledger::{ActiveBorrowFilter, LedgerStore, LedgerTx};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub books: BTreeMap<i32, Book>,
    pub readers: BTreeMap<i32, Reader>,
    pub borrows: BTreeMap<i32, BorrowRecord>,
}

impl MemoryState {
    pub fn active_borrows(&self, filter: ActiveBorrowFilter) -> i64 {
        self.borrows
            .values()
            .filter(|b| b.is_active())
            .filter(|b| match filter {
                ActiveBorrowFilter::Reader(id) => b.reader_id == id,
                ActiveBorrowFilter::Book(id) => b.book_id == id,
            })
            .count() as i64
    }

    fn next_id<T>(map: &BTreeMap<i32, T>) -> i32 {
        map.keys().next_back().copied().unwrap_or(0) + 1
    }
}

#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_book(&self, title: &str, copies_count: i32) -> Book {
        let mut state = self.state.lock().await;
        let book = Book {
            id: MemoryState::next_id(&state.books),
            title: title.to_string(),
            author: "Unknown".to_string(),
            publication_year: None,
            isbn: None,
            copies_count,
        };
        state.books.insert(book.id, book.clone());
        book
    }

    pub async fn add_reader(&self, name: &str) -> Reader {
        let mut state = self.state.lock().await;
        let id = MemoryState::next_id(&state.readers);
        let reader = Reader {
            id,
            name: name.to_string(),
            email: format!("reader{}@example.org", id),
            note: None,
        };
        state.readers.insert(reader.id, reader.clone());
        reader
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn book(&self, id: i32) -> Option<Book> {
        self.state.lock().await.books.get(&id).cloned()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn fetch_reader(&mut self, id: i32) -> AppResult<Option<Reader>> {
        Ok(self.work.readers.get(&id).cloned())
    }

    async fn fetch_book(&mut self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.work.books.get(&id).cloned())
    }

    async fn fetch_borrow(&mut self, id: i32) -> AppResult<Option<BorrowRecord>> {
        Ok(self.work.borrows.get(&id).cloned())
    }

    async fn reader_exists(&mut self, id: i32) -> AppResult<bool> {
        Ok(self.work.readers.contains_key(&id))
    }

    async fn count_active_borrows(&mut self, filter: ActiveBorrowFilter) -> AppResult<i64> {
        Ok(self.work.active_borrows(filter))
    }

    async fn active_borrows_for_reader(&mut self, reader_id: i32) -> AppResult<Vec<BorrowRecord>> {
        Ok(self
            .work
            .borrows
            .values()
            .filter(|b| b.reader_id == reader_id && b.is_active())
            .cloned()
            .collect())
    }

    async fn insert_borrow(&mut self, reader_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let borrow = BorrowRecord {
            id: MemoryState::next_id(&self.work.borrows),
            reader_id,
            book_id,
            borrow_date: Utc::now(),
            return_date: None,
        };
        self.work.borrows.insert(borrow.id, borrow.clone());
        Ok(borrow)
    }

    async fn mark_returned(&mut self, borrow_id: i32) -> AppResult<BorrowRecord> {
        let borrow = self
            .work
            .borrows
            .get_mut(&borrow_id)
            .ok_or(AppError::BorrowRecordNotFound(borrow_id))?;
        if !borrow.is_active() {
            return Err(AppError::AlreadyReturned(borrow_id));
        }
        borrow.return_date = Some(Utc::now());
        Ok(borrow.clone())
    }

    async fn adjust_copies(&mut self, book_id: i32, delta: i32) -> AppResult<Book> {
        let book = self
            .work
            .books
            .get_mut(&book_id)
            .ok_or(AppError::BookNotFound(book_id))?;
        // Mirrors check_copies_non_negative
        if book.copies_count + delta < 0 {
            return Err(AppError::Internal("copies_count would become negative".to_string()));
        }
        book.copies_count += delta;
        Ok(book.clone())
    }

    async fn delete_book(&mut self, id: i32) -> AppResult<()> {
        self.work.books.remove(&id).ok_or(AppError::BookNotFound(id))?;
        self.work.borrows.retain(|_, b| b.book_id != id);
        Ok(())
    }

    async fn delete_reader(&mut self, id: i32) -> AppResult<()> {
        self.work.readers.remove(&id).ok_or(AppError::ReaderNotFound(id))?;
        self.work.borrows.retain(|_, b| b.reader_id != id);
        Ok(())
    }

    async fn commit(&mut self) -> AppResult<()> {
        *self.guard = self.work.clone();
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>> {
        let guard = self.state.clone().lock_owned().await;
        let work = (*guard).clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_unit_of_work_leaves_no_trace() {
        let ledger = MemoryLedger::new();
        let book = ledger.add_book("Dune", 2).await;
        let reader = ledger.add_reader("Ada").await;

        {
            let mut tx = ledger.begin().await.unwrap();
            tx.insert_borrow(reader.id, book.id).await.unwrap();
            tx.adjust_copies(book.id, -1).await.unwrap();
        }

        let state = ledger.snapshot().await;
        assert!(state.borrows.is_empty());
        assert_eq!(state.books[&book.id].copies_count, 2);
    }

    #[tokio::test]
    async fn test_copies_never_go_negative() {
        let ledger = MemoryLedger::new();
        let book = ledger.add_book("Dune", 0).await;

        let mut tx = ledger.begin().await.unwrap();
        assert!(tx.adjust_copies(book.id, -1).await.is_err());
    }
}
