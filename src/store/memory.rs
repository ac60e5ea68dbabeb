use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AccountStore, StoreError};
use crate::models::Account;

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(email).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&account.email) {
            return Err(StoreError::AlreadyExists(account.email));
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        match accounts.get_mut(&account.email) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(account.email.clone())),
        }
    }
}
