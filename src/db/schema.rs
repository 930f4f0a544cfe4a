//! PostgreSQL schema bootstrap for accounts and the transfer ledger

use anyhow::Result;
use sqlx::PgPool;

use super::StoreConfig;

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool, config: &StoreConfig) -> Result<()> {
    tracing::info!(prefix = %config.table_prefix, "Initializing ledger schema...");

    for (what, statement) in schema_statements(config) {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", what, e))?;
    }

    tracing::info!("Ledger schema initialized successfully");
    Ok(())
}

/// DDL statements in execution order, each labelled for error messages
pub fn schema_statements(config: &StoreConfig) -> Vec<(&'static str, String)> {
    let t = config.tables();
    vec![
        (
            "accounts table",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {accounts} (
                    id            BIGSERIAL PRIMARY KEY,
                    role          SMALLINT NOT NULL DEFAULT 1,
                    email         VARCHAR(255) NOT NULL UNIQUE,
                    name          VARCHAR(255) NOT NULL,
                    password_hash TEXT NOT NULL,
                    balance       NUMERIC(30, 8) NOT NULL DEFAULT 0 CHECK (balance >= 0),
                    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                accounts = t.accounts
            ),
        ),
        (
            "accounts name index",
            format!(
                "CREATE INDEX IF NOT EXISTS {accounts}_name_idx ON {accounts} (name)",
                accounts = t.accounts
            ),
        ),
        (
            "transfers table",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {transfers} (
                    id                       BIGSERIAL PRIMARY KEY,
                    created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    sender_id                BIGINT NOT NULL REFERENCES {accounts} (id),
                    recipient_id             BIGINT NOT NULL REFERENCES {accounts} (id),
                    magnitude                NUMERIC(30, 8) NOT NULL CHECK (magnitude > 0),
                    sender_balance_before    NUMERIC(30, 8) NOT NULL,
                    sender_balance_after     NUMERIC(30, 8) NOT NULL,
                    recipient_balance_before NUMERIC(30, 8) NOT NULL,
                    recipient_balance_after  NUMERIC(30, 8) NOT NULL,
                    CHECK (sender_id <> recipient_id)
                )
                "#,
                transfers = t.transfers,
                accounts = t.accounts
            ),
        ),
        (
            "transfers sender index",
            format!(
                "CREATE INDEX IF NOT EXISTS {transfers}_sender_idx ON {transfers} (sender_id)",
                transfers = t.transfers
            ),
        ),
        (
            "transfers recipient index",
            format!(
                "CREATE INDEX IF NOT EXISTS {transfers}_recipient_idx ON {transfers} (recipient_id)",
                transfers = t.transfers
            ),
        ),
    ]
}
