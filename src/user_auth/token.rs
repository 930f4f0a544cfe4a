//! Stateless bearer tokens
//!
//! Format: `base64url(json payload) "." base64url(HMAC-SHA256(secret, encoded payload))`.
//! Nothing is stored server-side; a token lives until its `exp` or until the
//! secret is rotated.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, crypto};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core_types::AccountId;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token authority settings, assembled before the authority is built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Signing secret; rotating it invalidates every outstanding token
    pub secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,
    /// When set, issued tokens carry it and validation demands it
    #[serde(default)]
    pub issuer: Option<String>,
}

fn default_ttl_secs() -> i64 {
    3600
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: default_ttl_secs(),
            issuer: None,
        }
    }
}

/// Signed token section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Expiration, epoch seconds
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "sub")]
    pub subject: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Optional claims added at issuance
#[derive(Debug, Clone, Default)]
pub struct ExtraClaims {
    pub email: Option<String>,
}

impl ExtraClaims {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token payload cannot be decoded")]
    Undecodable,

    #[error("Token expired at {0}")]
    Expired(i64),

    #[error("Token issuer mismatch")]
    IssuerMismatch,

    #[error("Token has no subject")]
    NoSubject,

    #[error("Token cannot be produced: {0}")]
    Signing(String),
}

/// Issues and validates bearer tokens with a server-held secret
pub struct TokenAuthority {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl_secs", &self.config.ttl_secs)
            .field("issuer", &self.config.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a token for `subject`, valid for the configured TTL from now
    pub fn issue(&self, subject: AccountId, claims: ExtraClaims) -> Result<String, TokenError> {
        self.issue_at(subject, claims, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: AccountId,
        claims: ExtraClaims,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let payload = TokenPayload {
            issuer: self.config.issuer.clone(),
            expires_at: now.timestamp() + self.config.ttl_secs,
            subject,
            email: claims.email,
        };
        self.encode(&payload)
    }

    /// Validate a token against the current clock
    pub fn validate(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Check signature, expiry, issuer and subject, in that order.
    ///
    /// The payload is only decoded once its signature has been verified.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenPayload, TokenError> {
        let (encoded, signature) = split_token(token)?;

        let signature_ok = crypto::verify(
            signature,
            encoded.as_bytes(),
            &self.decoding_key,
            SIGNING_ALGORITHM,
        )
        .map_err(|_| TokenError::BadSignature)?;
        if !signature_ok {
            return Err(TokenError::BadSignature);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::Undecodable)?;
        let payload: TokenPayload =
            serde_json::from_slice(&bytes).map_err(|_| TokenError::Undecodable)?;

        if now.timestamp() > payload.expires_at {
            return Err(TokenError::Expired(payload.expires_at));
        }
        if let Some(expected) = &self.config.issuer
            && payload.issuer.as_deref() != Some(expected.as_str())
        {
            return Err(TokenError::IssuerMismatch);
        }
        if payload.subject == 0 {
            return Err(TokenError::NoSubject);
        }
        Ok(payload)
    }

    fn encode(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let json = serde_json::to_vec(payload).map_err(|e| TokenError::Signing(e.to_string()))?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let signature = crypto::sign(encoded.as_bytes(), &self.encoding_key, SIGNING_ALGORITHM)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(format!("{}.{}", encoded, signature))
    }
}

/// Split into payload and signature parts, rejecting anything but two
/// non-empty parts
fn split_token(token: &str) -> Result<(&str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(payload), Some(signature), None) if !payload.is_empty() && !signature.is_empty() => {
            Ok((payload, signature))
        }
        _ => Err(TokenError::Malformed),
    }
}
