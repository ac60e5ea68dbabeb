//! Account persistence. One record per account, looked up by email.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::Account;

mod memory;
mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account already exists: {0}")]
    AlreadyExists(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("stored account is corrupt: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts a new account; [`StoreError::AlreadyExists`] if the email is taken.
    async fn create(&self, account: Account) -> Result<Account, StoreError>;

    /// Overwrites profile and history of an existing account in one write.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;
}

pub fn memory() -> Arc<dyn AccountStore> {
    Arc::new(memory::MemoryAccountStore::default())
}

pub fn postgres(pool: PgPool) -> Arc<dyn AccountStore> {
    Arc::new(postgres::PostgresAccountStore::new(pool))
}
