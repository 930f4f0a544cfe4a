//! Data models for account management

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core_types::AccountId;

/// Trust tier of a caller.
///
/// Compared numerically: `Anonymous < Regular < Trusted`. Stored accounts are
/// always `Regular` or `Trusted`; `Anonymous` only describes a caller without
/// a valid credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Tier {
    Anonymous = 0,
    Regular = 1,
    Trusted = 2,
}

impl Tier {
    /// Numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID. Unknown values are not trusted with anything.
    pub fn from_id(id: i16) -> Self {
        match id {
            1 => Tier::Regular,
            2 => Tier::Trusted,
            _ => Tier::Anonymous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Anonymous => "anonymous",
            Tier::Regular => "regular",
            Tier::Trusted => "trusted",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub role: Tier,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Account about to be inserted. Balance is only set here, at creation time;
/// afterwards it changes through the ledger alone.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub role: Tier,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub balance: Decimal,
}
