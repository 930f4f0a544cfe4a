//! Ledger Engine
//!
//! Executes transfers as single atomic units against a [`TransferRepository`].
//!
//! # Unit of work
//!
//! ```text
//! begin → lock_pair → debit_if_covered(sender) → credit(recipient) → insert_transfer → commit
//!                          ↓ Insufficient/Missing        ↓ Missing          ↓ error
//!                       rollback                       rollback           rollback
//! ```
//!
//! The engine keeps no locks of its own. Two transfers racing on the same
//! sender are serialized by the store; the loser's conditional debit fails
//! and it reports `InsufficientFunds`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::error::TransferError;
use super::repository::{LedgerUnit, TransferRepository};
use super::types::{Debit, NewTransfer, TransferRecord};
use crate::core_types::{AccountId, TransferId};

/// Decimal places a balance holds in every store; finer sums would be rounded
pub const MAX_SUM_SCALE: u32 = 8;

/// Trailing zeros do not count: `1.500000000` fits, `0.000000015` does not
pub fn fits_store_scale(magnitude: Decimal) -> bool {
    magnitude.normalize().scale() <= MAX_SUM_SCALE
}

/// Ledger Engine - the only writer of account balances
pub struct LedgerEngine {
    repo: Arc<dyn TransferRepository>,
}

impl LedgerEngine {
    pub fn new(repo: Arc<dyn TransferRepository>) -> Self {
        Self { repo }
    }

    /// Move `magnitude` from `sender_id` to `recipient_id`.
    ///
    /// Both balance changes and the audit entry commit together or not at all.
    pub async fn create_transfer(
        &self,
        sender_id: AccountId,
        recipient_id: AccountId,
        magnitude: Decimal,
    ) -> Result<TransferRecord, TransferError> {
        if magnitude <= Decimal::ZERO {
            return Err(TransferError::InvalidSum);
        }
        if !fits_store_scale(magnitude) {
            return Err(TransferError::SumTooPrecise(MAX_SUM_SCALE));
        }
        if sender_id == recipient_id {
            return Err(TransferError::SelfTransfer);
        }

        let mut unit = self.repo.begin().await?;
        match Self::apply(unit.as_mut(), sender_id, recipient_id, magnitude).await {
            Ok(entry) => {
                let record = match unit.insert_transfer(entry).await {
                    Ok(record) => record,
                    Err(e) => return Err(Self::abort(unit, e).await),
                };
                unit.commit().await?;
                info!(
                    transfer_id = record.id,
                    sender_id,
                    recipient_id,
                    magnitude = %magnitude,
                    repo = self.repo.name(),
                    "Transfer committed"
                );
                Ok(record)
            }
            Err(e) => Err(Self::abort(unit, e).await),
        }
    }

    /// Run the same transfer again: same sender, recipient and magnitude.
    ///
    /// Current balances are re-checked by [`Self::create_transfer`]; the
    /// original record is left untouched.
    pub async fn repeat_transfer(
        &self,
        transfer_id: TransferId,
    ) -> Result<TransferRecord, TransferError> {
        let original = self
            .repo
            .get_transfer(transfer_id)
            .await?
            .ok_or(TransferError::TransferNotFound(transfer_id))?;

        debug!(transfer_id, "Repeating transfer");
        self.create_transfer(original.sender_id, original.recipient_id, original.magnitude)
            .await
    }

    pub async fn get_transfer(
        &self,
        transfer_id: TransferId,
    ) -> Result<Option<TransferRecord>, TransferError> {
        self.repo.get_transfer(transfer_id).await
    }

    /// Most recent transfers of an account, newest first, at most `limit`
    pub async fn list_recent(
        &self,
        account_id: AccountId,
        limit: i64,
    ) -> Result<Vec<TransferRecord>, TransferError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.repo.list_recent(account_id, limit).await
    }

    /// Debit then credit inside the open unit; returns the audit snapshot
    async fn apply(
        unit: &mut dyn LedgerUnit,
        sender_id: AccountId,
        recipient_id: AccountId,
        magnitude: Decimal,
    ) -> Result<NewTransfer, TransferError> {
        unit.lock_pair(sender_id, recipient_id).await?;

        let sender_after = match unit.debit_if_covered(sender_id, magnitude).await? {
            Debit::Applied(balance) => balance,
            Debit::Insufficient => return Err(TransferError::InsufficientFunds),
            Debit::Missing => return Err(TransferError::SenderNotFound),
        };
        if sender_after < Decimal::ZERO {
            // Store broke the debit predicate; never let this commit.
            error!(sender_id, balance = %sender_after, "Debit produced negative balance");
            return Err(TransferError::InsufficientFunds);
        }

        let recipient_after = unit
            .credit(recipient_id, magnitude)
            .await?
            .ok_or(TransferError::RecipientNotFound)?;

        Ok(NewTransfer::from_results(
            sender_id,
            recipient_id,
            magnitude,
            sender_after,
            recipient_after,
        ))
    }

    /// Roll the unit back and hand back the error that caused it
    async fn abort(unit: Box<dyn LedgerUnit>, cause: TransferError) -> TransferError {
        match &cause {
            TransferError::DatabaseError(msg) => {
                error!(error = %msg, "Transfer aborted by storage failure")
            }
            other => warn!(reason = other.code(), "Transfer rejected"),
        }
        if let Err(e) = unit.rollback().await {
            error!(error = %e, "Rollback failed; store discards the open unit");
        }
        cause
    }
}
