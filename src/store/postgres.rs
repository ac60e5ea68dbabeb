use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::{Account, CycleProfile, HistoryEntry};

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    last_period_start: Option<NaiveDate>,
    cycle_length: i32,
    period_duration: i32,
    history: Json<Vec<HistoryEntry>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            cycle_data: CycleProfile {
                last_period_start: row.last_period_start,
                cycle_length: row.cycle_length,
                period_duration: row.period_duration,
            },
            history: row.history.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn log_db_error(e: &sqlx::Error) {
    if let Some(db_err) = e.as_database_error() {
        tracing::error!("❌ DB error: {}", db_err.message());

        if let Some(code) = db_err.code() {
            tracing::info!("ℹ️ SQLSTATE code: {}", code);
        }

        if let Some(constraint) = db_err.constraint() {
            tracing::info!("🔒 Constraint violated: {}", constraint);
        }
    } else {
        tracing::error!("❌ Unknown DB error: {}", e);
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash, last_period_start, cycle_length, period_duration,
                    history, created_at, updated_at
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log_db_error(&e);
            match e {
                sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                    StoreError::Corrupt(e.to_string())
                }
                other => StoreError::Db(other),
            }
        })?;

        Ok(row.map(Account::from))
    }

    async fn create(&self, account: Account) -> Result<Account, StoreError> {
        sqlx::query(
            "INSERT INTO accounts
                (id, email, password_hash, last_period_start, cycle_length, period_duration,
                 history, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.cycle_data.last_period_start)
        .bind(account.cycle_data.cycle_length)
        .bind(account.cycle_data.period_duration)
        .bind(Json(&account.history))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log_db_error(&e);
            let duplicate = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                StoreError::AlreadyExists(account.email.clone())
            } else {
                StoreError::Db(e)
            }
        })?;

        Ok(account)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE accounts
             SET last_period_start = $2, cycle_length = $3, period_duration = $4,
                 history = $5, updated_at = $6
             WHERE email = $1",
        )
        .bind(&account.email)
        .bind(account.cycle_data.last_period_start)
        .bind(account.cycle_data.cycle_length)
        .bind(account.cycle_data.period_duration)
        .bind(Json(&account.history))
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log_db_error(&e);
            StoreError::Db(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(account.email.clone()));
        }
        Ok(())
    }
}
