//! Credential store boundary.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use awap_core::UserId;

use crate::{AuthError, NewUser, UserRecord, UserStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique email constraint would be violated.
    #[error("duplicate email")]
    Duplicate,

    #[error("record not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped (e.g. unknown role string).
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// User record storage used by authentication and account management.
///
/// Emails are passed already normalized (trimmed, lowercase).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new user; `StoreError::Duplicate` if the email exists.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn set_status(&self, id: UserId, status: UserStatus) -> Result<UserRecord, StoreError>;
}

/// Run a store call under a deadline; exceeding it is an upstream failure.
pub(crate) async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            if matches!(err, StoreError::Unavailable(_) | StoreError::Corrupt(_)) {
                tracing::error!(operation, error = %err, "credential store call failed");
            }
            Err(err.into())
        }
        Err(_) => {
            tracing::error!(operation, timeout_ms = limit.as_millis() as u64, "credential store call timed out");
            Err(AuthError::UpstreamUnavailable)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal store double for unit tests in this crate.

    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        rows: Mutex<Vec<UserRecord>>,
        pub fail: Mutex<bool>,
        /// Added to every email lookup before it answers.
        pub lookup_delay: Mutex<Option<Duration>>,
    }

    impl MemoryStore {
        pub fn failing() -> Self {
            let store = Self::default();
            *store.fail.lock().unwrap() = true;
            store
        }

        fn check(&self) -> Result<(), StoreError> {
            if *self.fail.lock().unwrap() {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            Ok(())
        }

        pub fn slow(delay: Duration) -> Self {
            let store = Self::default();
            *store.lookup_delay.lock().unwrap() = Some(delay);
            store
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
            let delay = *self.lookup_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|u| u.email == user.email) {
                return Err(StoreError::Duplicate);
            }
            let record = UserRecord {
                id: UserId::new(rows.len() as i64 + 1),
                email: user.email,
                name: user.name,
                password_hash: user.password_hash,
                role: user.role,
                department: user.department,
                status: user.status,
                created_at: Utc::now(),
            };
            rows.push(record.clone());
            Ok(record)
        }

        async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().len() as u64)
        }

        async fn set_status(&self, id: UserId, status: UserStatus) -> Result<UserRecord, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|u| u.id == id).ok_or(StoreError::NotFound)?;
            row.status = status;
            Ok(row.clone())
        }
    }
}
