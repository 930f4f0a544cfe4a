//! Transfer Error Types
//!
//! Every failure of the ledger falls into one [`ErrorKind`]; the gateway maps
//! kinds to status codes and never shows storage details to callers.

use thiserror::Error;

use crate::core_types::TransferId;

/// Error taxonomy shared by all ledger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input caught before the engine runs
    Validation,
    NotFound,
    /// Insufficient tier or not a party of the transfer
    Forbidden,
    InsufficientFunds,
    /// Request is well-formed but contradicts current state
    Conflict,
    /// Wrapped lower-level failure
    Storage,
}

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Transfer sum must be greater than zero")]
    InvalidSum,

    #[error("Transfer sum allows at most {0} decimal places")]
    SumTooPrecise(u32),

    #[error("Sender and recipient must differ")]
    SelfTransfer,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // === Account Errors ===
    #[error("Sender account not found")]
    SenderNotFound,

    #[error("Recipient account not found")]
    RecipientNotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    // === Access Errors ===
    #[error("Insufficient authority to complete request")]
    Forbidden,

    #[error("Transfer not found: {0}")]
    TransferNotFound(TransferId),

    // === System Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidSum
            | TransferError::SumTooPrecise(_)
            | TransferError::InvalidParameter(_) => ErrorKind::Validation,
            TransferError::SelfTransfer | TransferError::RecipientNotFound => ErrorKind::Conflict,
            TransferError::SenderNotFound | TransferError::TransferNotFound(_) => {
                ErrorKind::NotFound
            }
            TransferError::InsufficientFunds => ErrorKind::InsufficientFunds,
            TransferError::Forbidden => ErrorKind::Forbidden,
            TransferError::DatabaseError(_) => ErrorKind::Storage,
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidSum => "INVALID_SUM",
            TransferError::SumTooPrecise(_) => "SUM_TOO_PRECISE",
            TransferError::SelfTransfer => "SELF_TRANSFER",
            TransferError::InvalidParameter(_) => "INVALID_PARAMETER",
            TransferError::SenderNotFound => "SENDER_NOT_FOUND",
            TransferError::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::Forbidden => "FORBIDDEN",
            TransferError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            TransferError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InsufficientFunds => 422,
            ErrorKind::Storage => 500,
        }
    }

    /// Message safe to hand to a caller. Storage causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Storage => "Cannot complete request now".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<sqlx::Error> for TransferError {
    fn from(e: sqlx::Error) -> Self {
        TransferError::DatabaseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::SelfTransfer.code(), "SELF_TRANSFER");
        assert_eq!(TransferError::InsufficientFunds.code(), "INSUFFICIENT_FUNDS");
        assert_eq!(TransferError::TransferNotFound(3).code(), "TRANSFER_NOT_FOUND");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(TransferError::InvalidSum.kind(), ErrorKind::Validation);
        assert_eq!(TransferError::SumTooPrecise(8).kind(), ErrorKind::Validation);
        assert_eq!(TransferError::SelfTransfer.kind(), ErrorKind::Conflict);
        assert_eq!(TransferError::RecipientNotFound.kind(), ErrorKind::Conflict);
        assert_eq!(TransferError::SenderNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(TransferError::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(
            TransferError::DatabaseError("boom".into()).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::InvalidSum.http_status(), 400);
        assert_eq!(TransferError::Forbidden.http_status(), 403);
        assert_eq!(TransferError::TransferNotFound(1).http_status(), 404);
        assert_eq!(TransferError::SelfTransfer.http_status(), 409);
        assert_eq!(TransferError::InsufficientFunds.http_status(), 422);
        assert_eq!(TransferError::DatabaseError("x".into()).http_status(), 500);
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = TransferError::DatabaseError("relation \"accounts\" does not exist".into());
        assert_eq!(err.public_message(), "Cannot complete request now");
        assert!(err.to_string().contains("relation"));
        assert_eq!(TransferError::InsufficientFunds.public_message(), "Insufficient funds");
    }
}
