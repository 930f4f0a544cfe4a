//! Transfer Repository protocol
//!
//! The transactional contract the ledger engine needs from durable storage.
//! Implementations: [`super::db::PgLedgerStore`] and
//! [`super::memory::MemoryLedgerStore`].

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::error::TransferError;
use super::types::{Debit, NewTransfer, TransferRecord};
use crate::core_types::{AccountId, TransferId};

/// Store-side half of a transfer.
///
/// `begin` opens a unit of work whose effects become visible only on
/// [`LedgerUnit::commit`]. Isolation between concurrent units is the store's
/// job; the engine relies on it together with the conditional debit.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Get repository name for logging
    fn name(&self) -> &'static str;

    /// Open one atomic unit of work
    async fn begin(&self) -> Result<Box<dyn LedgerUnit>, TransferError>;

    async fn get_transfer(&self, id: TransferId) -> Result<Option<TransferRecord>, TransferError>;

    /// Transfers where the account is sender or recipient, newest id first.
    ///
    /// Implementations may assume `limit > 0`.
    async fn list_recent(
        &self,
        account_id: AccountId,
        limit: i64,
    ) -> Result<Vec<TransferRecord>, TransferError>;
}

/// An open unit of work.
///
/// Dropping a unit without committing discards everything it did.
#[async_trait]
pub trait LedgerUnit: Send {
    /// Take write locks on both accounts in ascending id order, so opposite
    /// transfers between one pair cannot deadlock. Stores that serialize
    /// whole units need nothing here.
    async fn lock_pair(&mut self, _a: AccountId, _b: AccountId) -> Result<(), TransferError> {
        Ok(())
    }

    /// Reduce the balance only if `balance - magnitude >= 0` holds at write time
    async fn debit_if_covered(
        &mut self,
        account_id: AccountId,
        magnitude: Decimal,
    ) -> Result<Debit, TransferError>;

    /// Increase the balance. Returns the resulting balance, `None` if the
    /// account does not exist.
    async fn credit(
        &mut self,
        account_id: AccountId,
        magnitude: Decimal,
    ) -> Result<Option<Decimal>, TransferError>;

    /// Append the audit entry; the store assigns id and creation time
    async fn insert_transfer(&mut self, entry: NewTransfer)
    -> Result<TransferRecord, TransferError>;

    async fn commit(self: Box<Self>) -> Result<(), TransferError>;

    async fn rollback(self: Box<Self>) -> Result<(), TransferError>;
}
