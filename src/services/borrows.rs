//! Borrow workflow: lending, returning and guarded deletes.
//!
//! Every operation here runs as a single ledger unit of work. Checks happen in
//! a fixed order and nothing is written until all of them pass, so a rejected
//! request leaves the ledger exactly as it found it.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{ActiveBorrows, MAX_ACTIVE_BORROWS},
        BorrowRecord,
    },
    repository::{ActiveBorrowFilter, LedgerStore},
};

#[derive(Clone)]
pub struct BorrowsService {
    ledger: Arc<dyn LedgerStore>,
}

impl BorrowsService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Lend one copy of a book to a reader
    pub async fn borrow_book(&self, book_id: i32, reader_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.ledger.begin().await?;

        // Reader row first, then book row
        tx.fetch_reader(reader_id)
            .await?
            .ok_or(AppError::ReaderNotFound(reader_id))?;

        let book = tx
            .fetch_book(book_id)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        if book.copies_count <= 0 {
            tracing::warn!(book_id, reader_id, "Borrow rejected: no copies available");
            return Err(AppError::NoCopiesAvailable(book_id));
        }

        let active = tx
            .count_active_borrows(ActiveBorrowFilter::Reader(reader_id))
            .await?;
        if active >= MAX_ACTIVE_BORROWS {
            tracing::warn!(book_id, reader_id, active, "Borrow rejected: limit reached");
            return Err(AppError::BorrowLimitExceeded {
                reader_id,
                limit: MAX_ACTIVE_BORROWS,
            });
        }

        let borrow = tx.insert_borrow(reader_id, book_id).await?;
        let book = tx.adjust_copies(book_id, -1).await?;
        tx.commit().await?;

        tracing::info!(
            borrow_id = borrow.id,
            book_id,
            reader_id,
            copies_left = book.copies_count,
            "Book borrowed"
        );
        Ok(borrow)
    }

    /// Close a borrow record and put the copy back on the shelf
    pub async fn return_book(&self, borrow_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.ledger.begin().await?;

        let borrow = tx
            .fetch_borrow(borrow_id)
            .await?
            .ok_or(AppError::BorrowRecordNotFound(borrow_id))?;

        if !borrow.is_active() {
            tracing::warn!(borrow_id, "Return rejected: already returned");
            return Err(AppError::AlreadyReturned(borrow_id));
        }

        let returned = tx.mark_returned(borrow_id).await?;

        // The foreign key cascades book deletes, so a live record always has its book
        tx.fetch_book(borrow.book_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "Borrow record {} references missing book {}",
                borrow_id, borrow.book_id
            ))
        })?;
        let book = tx.adjust_copies(borrow.book_id, 1).await?;
        tx.commit().await?;

        tracing::info!(
            borrow_id,
            book_id = book.id,
            reader_id = returned.reader_id,
            copies_left = book.copies_count,
            "Book returned"
        );
        Ok(returned)
    }

    /// Books a reader currently holds, oldest borrow first
    pub async fn active_borrows(&self, reader_id: i32) -> AppResult<ActiveBorrows> {
        let mut tx = self.ledger.begin().await?;

        // No row lock: listing never waits on a borrow in flight
        if !tx.reader_exists(reader_id).await? {
            return Err(AppError::ReaderNotFound(reader_id));
        }

        let borrowed_books = tx.active_borrows_for_reader(reader_id).await?;
        tx.commit().await?;

        Ok(ActiveBorrows { borrowed_books })
    }

    /// Delete a book unless a copy of it is still out
    pub async fn delete_book(&self, book_id: i32) -> AppResult<()> {
        let mut tx = self.ledger.begin().await?;

        tx.fetch_book(book_id)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        let active = tx
            .count_active_borrows(ActiveBorrowFilter::Book(book_id))
            .await?;
        if active > 0 {
            tracing::warn!(book_id, active, "Delete rejected: book is still borrowed");
            return Err(AppError::HasActiveBorrowings(format!("Book {}", book_id)));
        }

        tx.delete_book(book_id).await?;
        tx.commit().await?;

        tracing::info!(book_id, "Book deleted");
        Ok(())
    }

    /// Delete a reader unless they still hold a book
    pub async fn delete_reader(&self, reader_id: i32) -> AppResult<()> {
        let mut tx = self.ledger.begin().await?;

        tx.fetch_reader(reader_id)
            .await?
            .ok_or(AppError::ReaderNotFound(reader_id))?;

        let active = tx
            .count_active_borrows(ActiveBorrowFilter::Reader(reader_id))
            .await?;
        if active > 0 {
            tracing::warn!(reader_id, active, "Delete rejected: reader holds books");
            return Err(AppError::HasActiveBorrowings(format!("Reader {}", reader_id)));
        }

        tx.delete_reader(reader_id).await?;
        tx.commit().await?;

        tracing::info!(reader_id, "Reader deleted");
        Ok(())
    }
}
