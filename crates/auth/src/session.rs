//! Stateless session tokens (HS256-signed JWTs).
//!
//! Nothing is stored server-side: the issuer signs the claims and the reader
//! verifies the signature and time window on every request.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{AuthError, SessionClaims, SessionToken, validate_claims};

/// Server-held signing secret.
#[derive(Clone)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}

pub struct SessionIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &SessionSecret, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, claims: &SessionClaims) -> Result<(String, DateTime<Utc>), AuthError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `issued_at`; returns the token and its expiry.
    pub fn issue_at(
        &self,
        claims: &SessionClaims,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let expires_at = issued_at + self.ttl;
        let payload = SessionToken::new(claims.clone(), issued_at, expires_at);

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign session token");
            AuthError::Internal
        })?;
        Ok((token, expires_at))
    }
}

pub struct SessionReader {
    key: DecodingKey,
    validation: Validation,
}

impl SessionReader {
    pub fn new(secret: &SessionSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Recover the claims from a token.
    ///
    /// Every failure (bad signature, wrong algorithm, expired, unknown role,
    /// missing field) collapses to `Unauthenticated`.
    pub fn read(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.read_at(token, Utc::now())
    }

    pub fn read_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let data = jsonwebtoken::decode::<SessionToken>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            AuthError::Unauthenticated
        })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(error = %e, "session token claims invalid");
            AuthError::Unauthenticated
        })?;

        Ok(data.claims.claims)
    }
}
