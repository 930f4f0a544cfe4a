//! Internal Transfer Ledger
//!
//! Moves value between accounts as one atomic unit: a conditional debit, a
//! credit and an append-only audit entry with both parties' balance
//! snapshots.
//!
//! # Architecture
//!
//! ```text
//! api (HTTP) → TransferService (tier gate, censor) → LedgerEngine
//!                                                       ↓
//!                                    TransferRepository / LedgerUnit
//!                                       ├── PgLedgerStore (PostgreSQL)
//!                                       └── MemoryLedgerStore
//! ```
//!
//! Records never leave the crate uncensored: callers get a [`CensoredView`]
//! holding only their own side of the transfer.

pub mod api;
pub mod censor;
pub mod db;
pub mod engine;
pub mod error;
pub mod memory;
pub mod repository;
pub mod service;
pub mod types;


pub use censor::project;
pub use db::PgLedgerStore;
pub use engine::LedgerEngine;
pub use error::{ErrorKind, TransferError};
pub use memory::MemoryLedgerStore;
pub use repository::{LedgerUnit, TransferRepository};
pub use service::TransferService;
pub use types::{CensoredView, Debit, NewTransfer, TransferRecord};
