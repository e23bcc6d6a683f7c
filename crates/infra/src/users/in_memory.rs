use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use awap_auth::{CredentialStore, NewUser, StoreError, UserRecord, UserStatus};
use awap_core::UserId;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<UserRecord>,
    last_id: i64,
}

/// In-memory user table.
///
/// Intended for tests/dev. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<Table>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        if table.rows.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }

        table.last_id += 1;
        let record = UserRecord {
            id: UserId::new(table.last_id),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            department: user.department,
            status: user.status,
            created_at: Utc::now(),
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        // Insertion order is creation order.
        Ok(table.rows.iter().rev().cloned().collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.len() as u64)
    }

    async fn set_status(&self, id: UserId, status: UserStatus) -> Result<UserRecord, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let row = table
            .rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        row.status = status;
        Ok(row.clone())
    }
}
