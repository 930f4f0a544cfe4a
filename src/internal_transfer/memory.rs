//! In-memory ledger store
//!
//! Implements both storage protocols over one mutex-guarded state. A unit of
//! work holds the lock from `begin` until commit or rollback, so units are
//! fully serialized; staged writes reach the shared state only on commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::TransferError;
use super::repository::{LedgerUnit, TransferRepository};
use super::types::{Debit, NewTransfer, TransferRecord};
use crate::account::repository::check_new_account;
use crate::account::{Account, AccountError, AccountRepository, NewAccount};
use crate::core_types::{AccountId, TransferId};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<AccountId, Account>,
    /// Append-only; the record with id `n` sits at index `n - 1`
    transfers: Vec<TransferRecord>,
}

impl MemoryState {
    fn next_transfer_id(&self) -> TransferId {
        self.transfers.len() as TransferId + 1
    }
}

/// In-memory implementation of [`TransferRepository`] and [`AccountRepository`]
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
    fail_insert: Arc<AtomicBool>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following audit insert fail with a storage error.
    /// Used to exercise rollback after a successful debit.
    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Current balance of an account, `None` if unknown
    pub async fn balance_of(&self, account_id: AccountId) -> Option<Decimal> {
        let state = self.state.lock().await;
        state.accounts.get(&account_id).map(|a| a.balance)
    }

    /// Number of committed transfer records
    pub async fn transfer_count(&self) -> usize {
        self.state.lock().await.transfers.len()
    }
}

#[async_trait]
impl AccountRepository for MemoryLedgerStore {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        check_new_account(&account)?;

        let mut state = self.state.lock().await;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailTaken);
        }
        let id = state.accounts.keys().next_back().map_or(1, |last| last + 1);
        let created = Account {
            id,
            role: account.role,
            email: account.email,
            name: account.name,
            password_hash: account.password_hash,
            balance: account.balance,
            created_at: Utc::now(),
        };
        state.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.state.lock().await.accounts.get(&account_id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let state = self.state.lock().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl TransferRepository for MemoryLedgerStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn LedgerUnit>, TransferError> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryLedgerUnit {
            guard,
            balances: HashMap::new(),
            staged: Vec::new(),
            fail_insert: self.fail_insert.load(Ordering::SeqCst),
        }))
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<TransferRecord>, TransferError> {
        let state = self.state.lock().await;
        Ok(id
            .checked_sub(1)
            .and_then(|idx| state.transfers.get(idx as usize))
            .cloned())
    }

    async fn list_recent(
        &self,
        account_id: AccountId,
        limit: i64,
    ) -> Result<Vec<TransferRecord>, TransferError> {
        let state = self.state.lock().await;
        Ok(state
            .transfers
            .iter()
            .rev()
            .filter(|t| t.involves(account_id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

/// Open unit of work over the locked state
pub struct MemoryLedgerUnit {
    guard: OwnedMutexGuard<MemoryState>,
    /// Balances written by this unit, not yet visible to others
    balances: HashMap<AccountId, Decimal>,
    staged: Vec<TransferRecord>,
    fail_insert: bool,
}

impl MemoryLedgerUnit {
    fn current_balance(&self, account_id: AccountId) -> Option<Decimal> {
        self.balances.get(&account_id).copied().or_else(|| {
            self.guard
                .accounts
                .get(&account_id)
                .map(|account| account.balance)
        })
    }
}

#[async_trait]
impl LedgerUnit for MemoryLedgerUnit {
    async fn debit_if_covered(
        &mut self,
        account_id: AccountId,
        magnitude: Decimal,
    ) -> Result<Debit, TransferError> {
        let Some(balance) = self.current_balance(account_id) else {
            return Ok(Debit::Missing);
        };
        let after = balance - magnitude;
        if after < Decimal::ZERO {
            return Ok(Debit::Insufficient);
        }
        self.balances.insert(account_id, after);
        Ok(Debit::Applied(after))
    }

    async fn credit(
        &mut self,
        account_id: AccountId,
        magnitude: Decimal,
    ) -> Result<Option<Decimal>, TransferError> {
        let Some(balance) = self.current_balance(account_id) else {
            return Ok(None);
        };
        let after = balance + magnitude;
        self.balances.insert(account_id, after);
        Ok(Some(after))
    }

    async fn insert_transfer(
        &mut self,
        entry: NewTransfer,
    ) -> Result<TransferRecord, TransferError> {
        if self.fail_insert {
            return Err(TransferError::DatabaseError(
                "memory store: insert disabled".to_string(),
            ));
        }
        let id = self.guard.next_transfer_id() + self.staged.len() as TransferId;
        let record = entry.into_record(id, Utc::now());
        self.staged.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), TransferError> {
        let MemoryLedgerUnit {
            mut guard,
            balances,
            staged,
            ..
        } = *self;
        for (account_id, balance) in balances {
            if let Some(account) = guard.accounts.get_mut(&account_id) {
                account.balance = balance;
            }
        }
        guard.transfers.extend(staged);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), TransferError> {
        // Staged writes are dropped with the unit
        Ok(())
    }
}
