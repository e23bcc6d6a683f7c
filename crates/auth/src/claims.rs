use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use awap_core::UserId;

use crate::Role;

/// Identity and authorization attributes captured at sign-in.
///
/// This is the only shape downstream consumers see: UI rendering and API
/// authorization both read these fields and nothing else. The values are a
/// snapshot; later edits to the user record do not reach an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Signed payload: the session claims plus registered JWT fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(flatten)]
    pub claims: SessionClaims,

    /// Issued-at (seconds since the Unix epoch).
    pub iat: i64,

    /// Expiration (seconds since the Unix epoch).
    pub exp: i64,

    /// Token identifier.
    pub jti: Uuid,
}

impl SessionToken {
    pub fn new(claims: SessionClaims, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            claims,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed claims: {0}")]
    MalformedClaims(&'static str),
}

/// Deterministically validate a decoded token's claims.
///
/// Signature verification happens in [`crate::SessionReader`]; this checks the
/// time window against `now` and the claim shape.
pub fn validate_claims(token: &SessionToken, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let (Some(issued_at), Some(expires_at)) = (token.issued_at(), token.expires_at()) else {
        return Err(TokenValidationError::InvalidTimeWindow);
    };
    if expires_at <= issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < issued_at - chrono::Duration::seconds(CLOCK_SKEW_SECS) {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= expires_at {
        return Err(TokenValidationError::Expired);
    }

    let claims = &token.claims;
    if claims.id.get() <= 0 {
        return Err(TokenValidationError::MalformedClaims("id"));
    }
    if claims.email.trim().is_empty() {
        return Err(TokenValidationError::MalformedClaims("email"));
    }
    if claims.name.trim().is_empty() {
        return Err(TokenValidationError::MalformedClaims("name"));
    }
    Ok(())
}

/// Tolerated clock difference between issuer and reader.
const CLOCK_SKEW_SECS: i64 = 60;
