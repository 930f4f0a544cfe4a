//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.

/// Account ID - globally unique, immutable after assignment.
///
/// # Constraints:
/// - Assigned by the store, starting at 1
/// - `0` never names an account; a credential carrying it is rejected
pub type AccountId = u64;

/// Transfer ID - monotonically increasing within a store.
///
/// Ordering by this id is the "most recent first" order of account history.
pub type TransferId = u64;
