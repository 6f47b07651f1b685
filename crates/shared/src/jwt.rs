//! Bearer token inspection.
//!
//! The backend issues the bearer token and remains the only party that
//! verifies it. The client reads the unverified claims to mirror the
//! account identity and role and to notice a locally expired token before
//! sending a request that would come back 401. Nothing here is a security
//! decision.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for token inspection.
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Token is not a JWT: {0}")]
    Malformed(String),

    #[error("Token claims could not be read: {0}")]
    Unreadable(String),
}

/// Claims the dashboard cares about. Unknown claims are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (member login id)
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Role string as issued by the backend
    #[serde(default, alias = "auth")]
    pub role: Option<String>,
    /// Display name, when the backend embeds it
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenClaims {
    /// Expiration as an instant, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Whether the token has expired at `now`, allowing `leeway_secs` of skew.
    ///
    /// Tokens without `exp` never expire locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        match self.exp {
            Some(exp) => now.timestamp() > exp + leeway_secs,
            None => false,
        }
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: i64 = 30;

/// Reads the claims of a bearer token without verifying its signature.
pub fn peek_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let token = token.trim().trim_start_matches("Bearer ").trim();
    let header = decode_header(token).map_err(|e| ClaimsError::Malformed(e.to_string()))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ClaimsError::Unreadable(e.to_string()))
}

/// Convenience check used before attaching a cached token.
///
/// Opaque (non-JWT) tokens are never considered expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    peek_claims(token)
        .map(|claims| claims.is_expired_at(now, DEFAULT_LEEWAY_SECS))
        .unwrap_or(false)
}
