//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the account id and role with
//! a 24-hour expiry. The signing secret is injected at construction so
//! tests can run with their own secrets; rotating the secret
//! invalidates every outstanding token.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

pub const TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: Role,
    pub exp: usize,
}

pub struct TokenService {
    secret: String,
    expiry_hours: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours: TOKEN_EXPIRY_HOURS,
        }
    }

    /// Custom expiry, used by tests to mint already-expired tokens.
    #[must_use]
    pub fn with_expiry_hours(secret: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn issue(&self, id: i32, role: Role) -> Result<String, TokenError> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.expiry_hours))
            .ok_or_else(|| TokenError::Signing("Invalid expiry timestamp".to_string()))?
            .timestamp();

        let claims = Claims {
            id,
            role,
            exp: usize::try_from(expiration.max(0)).unwrap_or(0),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Fails on a bad signature, a malformed payload (including an
    /// unknown role string), or an elapsed expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
    }
}
