//! Transfer Core Types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core_types::{AccountId, TransferId};

/// Append-only audit entry of one committed transfer.
///
/// Holds both parties' balance snapshots, so it must never reach a caller
/// as-is; see [`super::censor::project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub id: TransferId,
    pub created_at: DateTime<Utc>,
    pub sender_id: AccountId,
    pub recipient_id: AccountId,
    /// Always positive; direction comes from sender/recipient
    pub magnitude: Decimal,
    pub sender_balance_before: Decimal,
    pub sender_balance_after: Decimal,
    pub recipient_balance_before: Decimal,
    pub recipient_balance_after: Decimal,
}

impl TransferRecord {
    /// Check if the account took part in this transfer
    #[inline]
    pub fn involves(&self, account_id: AccountId) -> bool {
        self.sender_id == account_id || self.recipient_id == account_id
    }
}

/// Audit entry as assembled inside a unit of work, before the store assigns
/// its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    pub sender_id: AccountId,
    pub recipient_id: AccountId,
    pub magnitude: Decimal,
    pub sender_balance_before: Decimal,
    pub sender_balance_after: Decimal,
    pub recipient_balance_before: Decimal,
    pub recipient_balance_after: Decimal,
}

impl NewTransfer {
    /// Build the snapshot from the balances the conditional writes returned.
    ///
    /// Deriving "before" from "after" keeps both balance equations exact no
    /// matter what committed between the unit's statements.
    pub fn from_results(
        sender_id: AccountId,
        recipient_id: AccountId,
        magnitude: Decimal,
        sender_balance_after: Decimal,
        recipient_balance_after: Decimal,
    ) -> Self {
        Self {
            sender_id,
            recipient_id,
            magnitude,
            sender_balance_before: sender_balance_after + magnitude,
            sender_balance_after,
            recipient_balance_before: recipient_balance_after - magnitude,
            recipient_balance_after,
        }
    }

    pub fn into_record(self, id: TransferId, created_at: DateTime<Utc>) -> TransferRecord {
        TransferRecord {
            id,
            created_at,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            magnitude: self.magnitude,
            sender_balance_before: self.sender_balance_before,
            sender_balance_after: self.sender_balance_after,
            recipient_balance_before: self.recipient_balance_before,
            recipient_balance_after: self.recipient_balance_after,
        }
    }
}

/// Result of a conditional debit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debit {
    /// Balance was reduced; carries the resulting balance
    Applied(Decimal),
    /// `balance - magnitude >= 0` did not hold at write time
    Insufficient,
    /// No such account
    Missing,
}

/// A transfer as one viewer is allowed to see it.
///
/// Only the viewer's own balances are present; the counterparty is named by
/// id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CensoredView {
    pub id: TransferId,
    pub date: DateTime<Utc>,
    pub is_credit: bool,
    /// Positive for credits, negative for debits
    pub sum: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    /// The other party of the transfer
    pub counterparty_id: AccountId,
}
