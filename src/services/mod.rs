//! Business logic services

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod readers;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::AppResult,
    repository::{LedgerStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub readers: readers::ReadersService,
    pub borrows: borrows::BorrowsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let ledger: Arc<dyn LedgerStore> = Arc::new(repository.clone());
        Self::with_ledger(repository, auth_config, ledger)
    }

    /// Create all services, running the borrow workflow against `ledger`
    pub fn with_ledger(
        repository: Repository,
        auth_config: AuthConfig,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            readers: readers::ReadersService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(ledger),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
