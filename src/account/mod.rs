//! Account management module
//!
//! Account records, trust tiers and the account storage protocol.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use error::AccountError;
pub use models::{Account, NewAccount, Tier};
pub use repository::{AccountRepository, PgAccountRepository};
