//! Transfer Service
//!
//! Caller-facing operations: gate the caller's tier, run the engine, and
//! project every record through the censor before it leaves.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::censor::project;
use super::engine::LedgerEngine;
use super::error::TransferError;
use super::types::CensoredView;
use crate::account::Account;
use crate::core_types::{AccountId, TransferId};
use crate::user_auth::access::{Operation, authorize};

pub struct TransferService {
    engine: Arc<LedgerEngine>,
}

impl TransferService {
    pub fn new(engine: Arc<LedgerEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    /// Send `sum` from the viewer to `recipient_id`
    pub async fn transfer(
        &self,
        viewer: &Account,
        recipient_id: AccountId,
        sum: Decimal,
    ) -> Result<CensoredView, TransferError> {
        authorize(viewer.role, Operation::CreateTransfer)?;
        let record = self
            .engine
            .create_transfer(viewer.id, recipient_id, sum)
            .await?;
        Ok(project(viewer.id, &record))
    }

    /// Repeat one of the viewer's own outgoing transfers
    pub async fn repeat(
        &self,
        viewer: &Account,
        transfer_id: TransferId,
    ) -> Result<CensoredView, TransferError> {
        authorize(viewer.role, Operation::RepeatTransfer)?;
        let original = self
            .engine
            .get_transfer(transfer_id)
            .await?
            .ok_or(TransferError::TransferNotFound(transfer_id))?;
        if original.sender_id != viewer.id {
            return Err(TransferError::Forbidden);
        }
        let record = self.engine.repeat_transfer(transfer_id).await?;
        Ok(project(viewer.id, &record))
    }

    pub async fn view(
        &self,
        viewer: &Account,
        transfer_id: TransferId,
    ) -> Result<CensoredView, TransferError> {
        authorize(viewer.role, Operation::ViewTransfer)?;
        let record = self
            .engine
            .get_transfer(transfer_id)
            .await?
            .ok_or(TransferError::TransferNotFound(transfer_id))?;
        if !record.involves(viewer.id) {
            return Err(TransferError::Forbidden);
        }
        Ok(project(viewer.id, &record))
    }

    /// Viewer's most recent transfers, newest first
    pub async fn history(
        &self,
        viewer: &Account,
        limit: i64,
    ) -> Result<Vec<CensoredView>, TransferError> {
        authorize(viewer.role, Operation::ListTransfers)?;
        let records = self.engine.list_recent(viewer.id, limit).await?;
        Ok(records.iter().map(|r| project(viewer.id, r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountRepository, NewAccount, Tier};
    use crate::internal_transfer::MemoryLedgerStore;

    async fn open(store: &MemoryLedgerStore, email: &str, role: Tier, balance: i64) -> Account {
        store
            .create(NewAccount {
                role,
                email: email.to_string(),
                name: email.to_string(),
                password_hash: "hash".to_string(),
                balance: Decimal::from(balance),
            })
            .await
            .unwrap()
    }

    fn service(store: &MemoryLedgerStore) -> TransferService {
        TransferService::new(Arc::new(LedgerEngine::new(Arc::new(store.clone()))))
    }

    #[tokio::test]
    async fn test_regular_cannot_transfer() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Regular, 500).await;
        let b = open(&store, "b@example.com", Tier::Regular, 0).await;

        let err = svc.transfer(&a, b.id, Decimal::from(10)).await.unwrap_err();
        assert_eq!(err, TransferError::Forbidden);
        assert_eq!(store.balance_of(a.id).await, Some(Decimal::from(500)));
    }

    #[tokio::test]
    async fn test_gate_hides_missing_recipient() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Regular, 500).await;

        let err = svc.transfer(&a, 999, Decimal::from(10)).await.unwrap_err();
        assert_eq!(err, TransferError::Forbidden);
    }

    #[tokio::test]
    async fn test_transfer_returns_sender_view() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Trusted, 500).await;
        let b = open(&store, "b@example.com", Tier::Regular, 0).await;

        let view = svc.transfer(&a, b.id, Decimal::from(200)).await.unwrap();
        assert!(!view.is_credit);
        assert_eq!(view.sum, Decimal::from(-200));
        assert_eq!(view.balance_after, Decimal::from(300));

        let seen_by_b = svc.view(&b, view.id).await.unwrap();
        assert!(seen_by_b.is_credit);
        assert_eq!(seen_by_b.balance_after, Decimal::from(200));
    }

    #[tokio::test]
    async fn test_outsider_cannot_view() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Trusted, 500).await;
        let b = open(&store, "b@example.com", Tier::Regular, 0).await;
        let c = open(&store, "c@example.com", Tier::Trusted, 0).await;

        let view = svc.transfer(&a, b.id, Decimal::from(50)).await.unwrap();
        assert_eq!(svc.view(&c, view.id).await.unwrap_err(), TransferError::Forbidden);
        assert_eq!(
            svc.view(&c, 404).await.unwrap_err(),
            TransferError::TransferNotFound(404)
        );
    }

    #[tokio::test]
    async fn test_only_sender_repeats() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Trusted, 500).await;
        let b = open(&store, "b@example.com", Tier::Trusted, 0).await;

        let first = svc.transfer(&a, b.id, Decimal::from(100)).await.unwrap();
        assert_eq!(
            svc.repeat(&b, first.id).await.unwrap_err(),
            TransferError::Forbidden
        );

        let again = svc.repeat(&a, first.id).await.unwrap();
        assert_ne!(again.id, first.id);
        assert_eq!(again.sum, first.sum);
        assert_eq!(again.balance_after, Decimal::from(300));
    }

    #[tokio::test]
    async fn test_history_is_censored_and_limited() {
        let store = MemoryLedgerStore::new();
        let svc = service(&store);
        let a = open(&store, "a@example.com", Tier::Trusted, 500).await;
        let b = open(&store, "b@example.com", Tier::Regular, 0).await;

        for _ in 0..3 {
            svc.transfer(&a, b.id, Decimal::from(10)).await.unwrap();
        }

        let history = svc.history(&b, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].id > history[1].id);
        assert!(history.iter().all(|v| v.is_credit && v.counterparty_id == a.id));
        assert!(svc.history(&b, 0).await.unwrap().is_empty());
    }
}
