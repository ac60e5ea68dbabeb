//! Register / login / update over the account store.
//!
//! Each operation is a single read-modify-write; any failure aborts the whole
//! operation before anything is written.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    cycle,
    error::AppError,
    models::{Account, CycleProfile, CycleUpdate, HistoryEntry},
    password,
    store::AccountStore,
};

/// Email addresses are matched case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let email = normalize_email(email);

        if self.store.find_by_email(&email).await?.is_some() {
            tracing::info!(%email, "registration refused, account exists");
            return Err(AppError::AlreadyExists);
        }

        let hash = password::hash_password(password)?;
        let account = self.store.create(Account::new(email, hash)).await?;

        tracing::info!(email = %account.email, id = %account.id, "✅ account registered");
        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let email = normalize_email(email);

        let Some(account) = self.store.find_by_email(&email).await? else {
            return Err(AppError::NotFound);
        };

        if !password::verify_password(password, &account.password_hash)? {
            tracing::warn!(%email, "login rejected, bad credentials");
            return Err(AppError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Replaces the current profile and upserts the matching history entry.
    pub async fn update(&self, email: &str, update: CycleUpdate) -> Result<Account, AppError> {
        let email = normalize_email(email);

        let Some(mut account) = self.store.find_by_email(&email).await? else {
            return Err(AppError::NotFound);
        };

        let profile = CycleProfile::from(update);
        account.cycle_data = profile;
        if let Some(entry) = HistoryEntry::from_profile(&profile) {
            account.history = cycle::merge(std::mem::take(&mut account.history), entry);
        }
        account.updated_at = Utc::now();

        self.store.save(&account).await?;

        tracing::info!(
            %email,
            start = %update.last_period_start,
            entries = account.history.len(),
            "cycle data saved"
        );
        Ok(account)
    }
}
