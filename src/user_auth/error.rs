//! User authentication error types

use thiserror::Error;

use super::token::TokenError;
use crate::account::AccountError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuth,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] TokenError),

    /// Token was valid but its subject no longer exists
    #[error("Invalid or expired token")]
    UnknownSubject,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password length must be {0} or greater")]
    WeakPassword(usize),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Account storage error: {0}")]
    Storage(String),

    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::MissingAuth
            | AuthError::InvalidFormat
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject
            | AuthError::InvalidCredentials => 401,
            AuthError::WeakPassword(_) => 400,
            AuthError::EmailTaken => 409,
            AuthError::Storage(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Message safe to hand to a caller
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Storage(_) | AuthError::Internal(_) => {
                "Cannot complete request now".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<AccountError> for AuthError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::EmailTaken => AuthError::EmailTaken,
            AccountError::MissingField(field) => {
                AuthError::Internal(format!("missing field {}", field))
            }
            AccountError::DatabaseError(msg) => AuthError::Storage(msg),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(msg) => AuthError::Internal(msg),
            other => AuthError::InvalidToken(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(AuthError::MissingAuth.http_status(), 401);
        assert_eq!(AuthError::InvalidToken(TokenError::Malformed).http_status(), 401);
        assert_eq!(AuthError::WeakPassword(5).http_status(), 400);
        assert_eq!(AuthError::EmailTaken.http_status(), 409);
        assert_eq!(AuthError::Storage("x".into()).http_status(), 500);
    }

    #[test]
    fn test_token_failures_look_alike() {
        let expired = AuthError::from(TokenError::Expired(1));
        let forged = AuthError::from(TokenError::BadSignature);
        assert_eq!(expired.to_string(), forged.to_string());
        assert_eq!(AuthError::UnknownSubject.to_string(), forged.to_string());
    }

    #[test]
    fn test_storage_hidden() {
        let err = AuthError::from(AccountError::DatabaseError("pool timed out".into()));
        assert_eq!(err.public_message(), "Cannot complete request now");
    }
}
