//! Viewer-relative projection of transfer records

use super::types::{CensoredView, TransferRecord};
use crate::core_types::AccountId;

/// Shape `record` for `viewer_id`.
///
/// The viewer must be a party of the transfer; callers check
/// [`TransferRecord::involves`] first. A viewer that is not the recipient is
/// treated as the sender.
pub fn project(viewer_id: AccountId, record: &TransferRecord) -> CensoredView {
    let is_credit = viewer_id == record.recipient_id;
    if is_credit {
        CensoredView {
            id: record.id,
            date: record.created_at,
            is_credit,
            sum: record.magnitude,
            balance_before: record.recipient_balance_before,
            balance_after: record.recipient_balance_after,
            counterparty_id: record.sender_id,
        }
    } else {
        CensoredView {
            id: record.id,
            date: record.created_at,
            is_credit,
            sum: -record.magnitude,
            balance_before: record.sender_balance_before,
            balance_after: record.sender_balance_after,
            counterparty_id: record.recipient_id,
        }
    }
}
