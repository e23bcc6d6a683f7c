//! Append-only audit trail of privileged actions.
//!
//! Recording is best effort from the caller's point of view: the admin
//! action has already happened, so a failed write is logged and dropped.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use awap_core::{AuditEntryId, UserId};

pub use in_memory::InMemoryAuditLog;
pub use postgres::PostgresAuditLog;

/// Most entries ever returned by one read.
pub const MAX_RECENT: usize = 500;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    UserCreate,
    UserStatusChange,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserCreate => "user_create",
            AuditAction::UserStatusChange => "user_status_change",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub admin_user_id: UserId,
    /// Actor display name; the Postgres backend resolves it by join instead.
    pub admin_name: Option<String>,
    pub action: AuditAction,
    pub target_type: &'static str,
    pub target_id: Option<i64>,
    pub details: String,
    pub outcome: AuditOutcome,
}

impl NewAuditEntry {
    pub fn user_created(actor: UserId, actor_name: &str, target: UserId, name: &str, email: &str) -> Self {
        Self {
            admin_user_id: actor,
            admin_name: Some(actor_name.to_string()),
            action: AuditAction::UserCreate,
            target_type: "user",
            target_id: Some(target.get()),
            details: format!("Created user: {name} ({email})"),
            outcome: AuditOutcome::Success,
        }
    }

    pub fn status_changed(actor: UserId, actor_name: &str, target: UserId, name: &str, status: &str) -> Self {
        Self {
            admin_user_id: actor,
            admin_name: Some(actor_name.to_string()),
            action: AuditAction::UserStatusChange,
            target_type: "user",
            target_id: Some(target.get()),
            details: format!("Changed status to {status}: {name}"),
            outcome: AuditOutcome::Success,
        }
    }
}

/// A stored audit row as returned to administrators.
///
/// Action and outcome are kept as strings on read so rows written by
/// other tools still display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub admin_user_id: Option<UserId>,
    pub admin_name: Option<String>,
    pub action_type: String,
    pub target_type: String,
    pub target_id: Option<i64>,
    pub details: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit log unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt audit row: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntryId, AuditError>;

    /// Newest first, at most `limit` (capped at [`MAX_RECENT`]).
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Record an entry, logging instead of propagating a failure.
pub async fn record_best_effort(log: &dyn AuditLog, entry: NewAuditEntry) {
    let action = entry.action.as_str();
    match log.record(entry).await {
        Ok(id) => tracing::debug!(audit_id = %id, action, "audit entry recorded"),
        Err(e) => tracing::warn!(error = %e, action, "failed to record audit entry"),
    }
}
