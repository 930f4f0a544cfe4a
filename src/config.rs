use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::db::StoreConfig;
use crate::user_auth::TokenConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub table_prefix: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            postgres_url: None,
            table_prefix: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::with_prefix(&self.table_prefix)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Balance granted to newly registered accounts
    pub initial_balance: Decimal,
    /// Default page size for transfer history
    pub history_limit: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: Decimal::from(500),
            history_limit: 10,
        }
    }
}

impl AppConfig {
    /// Read and validate `config/{env}.yaml`
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config: {}", config_path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse config yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.secret.is_empty() {
            bail!("token.secret must not be empty");
        }
        if self.token.ttl_secs <= 0 {
            bail!("token.ttl_secs must be positive");
        }
        if self.storage.backend == StorageBackend::Postgres
            && self
                .storage
                .postgres_url
                .as_deref()
                .is_none_or(|url| url.is_empty())
        {
            bail!("storage.postgres_url is required for the postgres backend");
        }
        if self.ledger.history_limit <= 0 {
            bail!("ledger.history_limit must be positive");
        }
        if self.ledger.initial_balance < Decimal::ZERO {
            bail!("ledger.initial_balance must not be negative");
        }
        Ok(())
    }
}
