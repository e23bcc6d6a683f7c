//! `awap-core`: shared domain primitives (identifiers, domain errors).
//!
//! No infrastructure or transport concerns live here.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{AuditEntryId, UserId};
