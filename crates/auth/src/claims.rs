//! Bearer-token claims: decoding and deterministic validation.
//!
//! The local check is advisory only. It short-circuits tokens that are
//! provably unusable (malformed, already expired) so they never reach the
//! network; it never substitutes for remote validation. Signature
//! verification stays with the backend, since the client holds no key.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in the bearer token payload.
///
/// Only the claims the client inspects are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    /// Subject (the account email).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl BearerClaims {
    /// Embedded expiry as a UTC timestamp.
    ///
    /// Out-of-range values are treated as absent, which defers the decision
    /// to remote validation.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential: {0}")]
    Malformed(String),

    #[error("credential has expired")]
    Expired,
}

/// Decode the payload segment of a bearer token without verifying it.
pub fn decode_claims(token: &str) -> Result<BearerClaims, CredentialError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(CredentialError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| CredentialError::Malformed(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| CredentialError::Malformed(format!("payload is not a claims object: {e}")))
}

/// Deterministically validate decoded claims against a clock reading.
///
/// A missing `exp` passes: the backend remains authoritative for such
/// tokens. An `exp` at or before `now` fails.
pub fn validate_claims(claims: &BearerClaims, now: DateTime<Utc>) -> Result<(), CredentialError> {
    match claims.expires_at() {
        Some(expires_at) if expires_at <= now => Err(CredentialError::Expired),
        _ => Ok(()),
    }
}

/// Decode and validate in one step: the pre-network credential check.
pub fn check_credential(token: &str, now: DateTime<Utc>) -> Result<BearerClaims, CredentialError> {
    let claims = decode_claims(token)?;
    validate_claims(&claims, now)?;
    Ok(claims)
}
