//! Internal Ledger - HTTP service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌──────────┐
//! │  Config  │───▶│  Store   │───▶│ LedgerEngine │───▶│ Gateway  │
//! │  (YAML)  │    │(PG / mem)│    │  + services  │    │  (axum)  │
//! └──────────┘    └──────────┘    └──────────────┘    └──────────┘
//! ```
//!
//! Usage: `internal_ledger [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use internal_ledger::account::{AccountRepository, PgAccountRepository};
use internal_ledger::config::{AppConfig, StorageBackend};
use internal_ledger::db::{Database, init_schema};
use internal_ledger::gateway::{self, state::AppState};
use internal_ledger::internal_transfer::{MemoryLedgerStore, PgLedgerStore, TransferRepository};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn open_stores(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn AccountRepository>, Arc<dyn TransferRepository>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let url = config
                .storage
                .postgres_url
                .as_deref()
                .context("storage.postgres_url is not set")?;
            let db = Database::connect(url, config.storage.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.health_check().await.context("PostgreSQL health check failed")?;

            let store_config = config.storage.store_config();
            init_schema(db.pool(), &store_config).await?;

            let accounts: Arc<dyn AccountRepository> =
                Arc::new(PgAccountRepository::new(db.pool().clone(), &store_config));
            let ledger: Arc<dyn TransferRepository> =
                Arc::new(PgLedgerStore::new(db.pool().clone(), &store_config));
            Ok((accounts, ledger))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on exit");
            let store = MemoryLedgerStore::new();
            let accounts: Arc<dyn AccountRepository> = Arc::new(store.clone());
            let ledger: Arc<dyn TransferRepository> = Arc::new(store);
            Ok((accounts, ledger))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    let _log_guard = internal_ledger::logging::init_logging(&app_config);

    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    tracing::info!(
        env = %env,
        backend = ?app_config.storage.backend,
        "Starting internal ledger"
    );

    let (accounts, ledger) = open_stores(&app_config).await?;
    let host = app_config.gateway.host.clone();
    let port = app_config.gateway.port;
    let state = Arc::new(AppState::assemble(app_config, accounts, ledger));

    gateway::run_server(&host, port, state).await
}
