use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::AuthError;
use super::token::{ExtraClaims, TokenAuthority};
use crate::account::{Account, AccountRepository, NewAccount, Tier};
use crate::core_types::AccountId;

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 5;

/// User Registration Request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// User Login Request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth Response (bearer token)
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Tier,
}

impl AuthResponse {
    fn new(token: String, account: &Account) -> Self {
        Self {
            token,
            account_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// Argon2id PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("hashing failed: {}", e)))?
        .to_string())
}

pub struct UserAuthService {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<TokenAuthority>,
    initial_balance: Decimal,
}

impl UserAuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<TokenAuthority>,
        initial_balance: Decimal,
    ) -> Self {
        Self {
            accounts,
            tokens,
            initial_balance,
        }
    }

    /// Register a regular account funded with the initial balance
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let password_hash = hash_password(&req.password)?;

        let account = self
            .accounts
            .create(NewAccount {
                role: Tier::Regular,
                email: req.email,
                name: req.name,
                password_hash,
                balance: self.initial_balance,
            })
            .await?;
        info!(account_id = account.id, "Account registered");

        let token = self.issue(&account)?;
        Ok(AuthResponse::new(token, &account))
    }

    /// Verify the password and issue a token
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let account = self
            .accounts
            .get_by_email(&req.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|e| {
            warn!(account_id = account.id, error = %e, "Stored password hash unreadable");
            AuthError::InvalidCredentials
        })?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = self.issue(&account)?;
        Ok(AuthResponse::new(token, &account))
    }

    /// Resolve an `Authorization` header value to its account
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Account, AuthError> {
        let header = header.ok_or(AuthError::MissingAuth)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?;
        self.authenticate_token(token).await
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<Account, AuthError> {
        let payload = self.tokens.validate(token)?;
        self.accounts
            .get_by_id(payload.subject)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }

    fn issue(&self, account: &Account) -> Result<String, AuthError> {
        Ok(self
            .tokens
            .issue(account.id, ExtraClaims::with_email(account.email.clone()))?)
    }
}
