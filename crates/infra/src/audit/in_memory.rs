use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use awap_core::AuditEntryId;

use super::{AuditEntry, AuditError, AuditLog, MAX_RECENT, NewAuditEntry};

/// In-memory audit trail for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntryId, AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditError::Unavailable("lock poisoned".to_string()))?;

        let id = AuditEntryId::new(entries.len() as i64 + 1);
        entries.push(AuditEntry {
            id,
            admin_user_id: Some(entry.admin_user_id),
            admin_name: entry.admin_name,
            action_type: entry.action.as_str().to_string(),
            target_type: entry.target_type.to_string(),
            target_id: entry.target_id,
            details: Some(entry.details),
            status: entry.outcome.as_str().to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.iter().rev().take(limit.min(MAX_RECENT)).cloned().collect())
    }
}
