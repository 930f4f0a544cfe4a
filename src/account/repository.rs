//! Repository layer for account storage

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::error::AccountError;
use super::models::{Account, NewAccount, Tier};
use crate::core_types::AccountId;
use crate::db::{StoreConfig, Tables};

/// Account storage protocol
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; the store assigns id and creation time
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;

    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>, AccountError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;
}

/// Reject accounts the store must never hold
pub(crate) fn check_new_account(account: &NewAccount) -> Result<(), AccountError> {
    if account.email.trim().is_empty() {
        return Err(AccountError::MissingField("email"));
    }
    if account.name.trim().is_empty() {
        return Err(AccountError::MissingField("name"));
    }
    if account.password_hash.is_empty() {
        return Err(AccountError::MissingField("password_hash"));
    }
    Ok(())
}

/// PostgreSQL account repository
pub struct PgAccountRepository {
    pool: PgPool,
    tables: Tables,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            tables: config.tables(),
        }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
        Ok(Account {
            id: row.try_get::<i64, _>("id")? as u64,
            role: Tier::from_id(row.try_get("role")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
            balance: row.try_get("balance")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        check_new_account(&account)?;

        let sql = format!(
            r#"INSERT INTO {} (role, email, name, password_hash, balance)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, role, email, name, password_hash, balance, created_at"#,
            self.tables.accounts
        );
        let row = sqlx::query(&sql)
            .bind(account.role.id())
            .bind(&account.email)
            .bind(&account.name)
            .bind(&account.password_hash)
            .bind(account.balance)
            .fetch_one(&self.pool)
            .await?;

        Ok(Self::row_to_account(&row)?)
    }

    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>, AccountError> {
        let sql = format!(
            r#"SELECT id, role, email, name, password_hash, balance, created_at
               FROM {} WHERE id = $1"#,
            self.tables.accounts
        );
        let row = sqlx::query(&sql)
            .bind(account_id as i64)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::row_to_account).transpose()?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let sql = format!(
            r#"SELECT id, role, email, name, password_hash, balance, created_at
               FROM {} WHERE email = $1"#,
            self.tables.accounts
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::row_to_account).transpose()?)
    }
}
