//! User authentication
//!
//! Password accounts, stateless bearer tokens and the tier gate in front of
//! ledger operations.

pub mod access;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod service;
pub mod token;

pub use access::{Operation, authorize};
pub use error::AuthError;
pub use service::{AuthResponse, LoginRequest, RegisterRequest, UserAuthService, hash_password};
pub use token::{ExtraClaims, TokenAuthority, TokenConfig, TokenError, TokenPayload};
