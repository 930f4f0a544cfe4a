//! Internal Transfer Ledger
//!
//! Atomic account-to-account transfers behind a signed-token identity layer.
//!
//! # Modules
//!
//! - [`core_types`] - Account and transfer identifiers
//! - [`account`] - Accounts, trust tiers and account storage
//! - [`internal_transfer`] - Ledger engine, storage protocol, censoring projector
//! - [`user_auth`] - Token authority, password login, authorization gate
//! - [`gateway`] - HTTP routes and response envelope
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod internal_transfer;
pub mod logging;
pub mod user_auth;

// Convenient re-exports at crate root
pub use account::{Account, Tier};
pub use core_types::{AccountId, TransferId};
pub use internal_transfer::{
    CensoredView, LedgerEngine, MemoryLedgerStore, PgLedgerStore, TransferError, TransferRecord,
    TransferService,
};
pub use user_auth::{TokenAuthority, TokenConfig};
