//! Infrastructure layer: user storage, audit trail, database wiring.

pub mod audit;
pub mod db;
pub mod seed;
pub mod users;

pub use audit::{AuditAction, AuditEntry, AuditError, AuditLog, AuditOutcome, NewAuditEntry};
pub use users::{InMemoryUserStore, PostgresUserStore};
