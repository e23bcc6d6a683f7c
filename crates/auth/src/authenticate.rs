//! Credential authentication: email + password → signed session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::store::bounded;
use crate::user::normalize_email;
use crate::{AuthError, CredentialStore, HashCost, SessionClaims, SessionIssuer, UserRecord, UserStatus, password};

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: UserRecord,
    pub claims: SessionClaims,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Why a sign-in was refused. Logged, never returned to the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Rejection {
    NoSuchUser,
    WrongPassword,
    MalformedHash,
    Disabled,
}

impl Rejection {
    fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoSuchUser => "no_such_user",
            Rejection::WrongPassword => "wrong_password",
            Rejection::MalformedHash => "malformed_hash",
            Rejection::Disabled => "account_disabled",
        }
    }
}

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    issuer: SessionIssuer,
    lookup_timeout: Duration,
    // Verified against when the email is unknown so both paths cost one hash.
    dummy_hash: Arc<str>,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: SessionIssuer,
        cost: HashCost,
        lookup_timeout: Duration,
    ) -> Result<Self, AuthError> {
        let dummy_hash = password::hash("timing-equalizer", cost)?;
        Ok(Self {
            store,
            issuer,
            lookup_timeout,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Single pass: look the user up, verify the password, sign the claims.
    ///
    /// Unknown email, wrong password, malformed stored hash and disabled
    /// accounts all surface as `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, plaintext: &str) -> Result<AuthenticatedSession, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || plaintext.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let found = bounded("find_by_email", self.lookup_timeout, self.store.find_by_email(&email)).await?;

        let user = match found {
            Some(user) => {
                match verify_blocking(plaintext, user.password_hash.as_str()).await? {
                    Ok(true) if user.status == UserStatus::Disabled => Err(Rejection::Disabled),
                    Ok(true) => Ok(user),
                    Ok(false) => Err(Rejection::WrongPassword),
                    Err(_) => Err(Rejection::MalformedHash),
                }
            }
            None => {
                let _ = verify_blocking(plaintext, &self.dummy_hash).await?;
                Err(Rejection::NoSuchUser)
            }
        };

        let user = match user {
            Ok(user) => user,
            Err(rejection) => {
                match rejection {
                    Rejection::MalformedHash => {
                        tracing::error!(email = %email, reason = rejection.as_str(), "sign-in rejected")
                    }
                    _ => tracing::info!(email = %email, reason = rejection.as_str(), "sign-in rejected"),
                }
                return Err(AuthError::InvalidCredentials);
            }
        };

        let claims = user.session_claims();
        let (token, expires_at) = self.issuer.issue(&claims)?;
        tracing::info!(user_id = %user.id, role = %user.role, "sign-in succeeded");

        Ok(AuthenticatedSession {
            user,
            claims,
            token,
            expires_at,
        })
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn verify_blocking(plaintext: &str, stored: &str) -> Result<Result<bool, password::PasswordError>, AuthError> {
    let plaintext = plaintext.to_owned();
    let stored = stored.to_owned();
    tokio::task::spawn_blocking(move || password::verify(&plaintext, &stored))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            AuthError::Internal
        })
}
