//! Reader management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        reader::{CreateReader, UpdateReader},
        PageQuery, Reader,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadersService {
    repository: Repository,
}

impl ReadersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List readers by name
    pub async fn list_readers(&self, query: &PageQuery) -> AppResult<(Vec<Reader>, i64)> {
        self.repository.readers.list(query).await
    }

    pub async fn get_reader(&self, id: i32) -> AppResult<Reader> {
        self.repository.readers.get_by_id(id).await
    }

    /// Register a new reader
    pub async fn create_reader(&self, reader: CreateReader) -> AppResult<Reader> {
        reader.validate()?;

        if self.repository.readers.email_exists(&reader.email, None).await? {
            return Err(AppError::DuplicateEmail(reader.email));
        }

        let created = self.repository.readers.create(&reader).await?;
        tracing::info!(reader_id = created.id, "Reader created");
        Ok(created)
    }

    /// Update the fields present in the request
    pub async fn update_reader(&self, id: i32, update: UpdateReader) -> AppResult<Reader> {
        update.check()?;

        if let Some(ref email) = update.email {
            if self.repository.readers.email_exists(email, Some(id)).await? {
                return Err(AppError::DuplicateEmail(email.clone()));
            }
        }

        self.repository.readers.update(id, &update).await
    }
}
