//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{CreateBook, UpdateBook},
        Book, PageQuery,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books, newest first
    pub async fn list_books(&self, query: &PageQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, None).await? {
                return Err(AppError::DuplicateIsbn(isbn.clone()));
            }
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book created");
        Ok(created)
    }

    /// Update the fields present in the request
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        update.check()?;

        if let Some(Some(ref isbn)) = update.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::DuplicateIsbn(isbn.clone()));
            }
        }

        self.repository.books.update(id, &update).await
    }
}
