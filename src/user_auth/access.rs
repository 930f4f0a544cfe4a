//! Tier-based authorization gate

use crate::account::Tier;
use crate::internal_transfer::TransferError;

/// Operations that sit behind the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateTransfer,
    RepeatTransfer,
    ViewTransfer,
    ListTransfers,
    ViewOwnAccount,
    ViewOtherAccount,
}

impl Operation {
    /// Lowest tier allowed to run the operation
    pub fn min_tier(&self) -> Tier {
        match self {
            Operation::CreateTransfer
            | Operation::RepeatTransfer
            | Operation::ViewOtherAccount => Tier::Trusted,
            Operation::ViewTransfer | Operation::ListTransfers | Operation::ViewOwnAccount => {
                Tier::Regular
            }
        }
    }
}

/// Reject callers below the operation's tier.
///
/// Runs before any lookup, so a rejection says nothing about whether the
/// target exists.
pub fn authorize(tier: Tier, operation: Operation) -> Result<(), TransferError> {
    if tier >= operation.min_tier() {
        Ok(())
    } else {
        tracing::debug!(?operation, %tier, "Operation forbidden for tier");
        Err(TransferError::Forbidden)
    }
}
