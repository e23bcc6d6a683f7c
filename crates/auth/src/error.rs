use thiserror::Error;

use crate::{PasswordError, StoreError};

/// Failures of the authentication/authorization flow.
///
/// Messages are safe to show to clients: none of them say which part of a
/// credential check failed or carry storage details.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    /// Covers both an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password must be at least 6 characters")]
    WeakPassword,

    #[error("an account with this email already exists")]
    DuplicateAccount,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("insufficient role for this resource")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("service temporarily unavailable")]
    UpstreamUnavailable,

    #[error("internal error")]
    Internal,
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AuthError::DuplicateAccount,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Unavailable(_) | StoreError::Corrupt(_) => AuthError::UpstreamUnavailable,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => AuthError::WeakPassword,
            PasswordError::MalformedHash => AuthError::InvalidCredentials,
            PasswordError::InvalidCost(_) | PasswordError::Hashing(_) => AuthError::Internal,
        }
    }
}

impl From<awap_core::DomainError> for AuthError {
    fn from(err: awap_core::DomainError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}
