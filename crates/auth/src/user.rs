//! User records as the credential store holds them.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use awap_core::{DomainError, UserId};

use crate::{Role, SessionClaims};

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Disabled,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Disabled => "disabled",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Disabled,
            UserStatus::Disabled => UserStatus::Active,
        }
    }

    /// Parse a stored status column. A missing value counts as active.
    pub fn from_column(value: Option<&str>) -> Result<Self, DomainError> {
        match value {
            None => Ok(UserStatus::Active),
            Some(s) if s.trim().is_empty() => Ok(UserStatus::Active),
            Some(s) => s.parse(),
        }
    }
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(UserStatus::Active),
            "disabled" => Ok(UserStatus::Disabled),
            other => Err(DomainError::validation(format!("unknown user status '{other}'"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A stored user, including the password hash.
///
/// Deliberately not `Serialize`: responses go through [`PublicUser`].
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub department: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl core::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("department", &self.department)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl UserRecord {
    pub fn session_claims(&self) -> SessionClaims {
        SessionClaims {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            department: self.department.clone(),
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            department: self.department.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// A user to be inserted; the hash is computed before it reaches the store.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub department: Option<String>,
    pub status: UserStatus,
}

impl core::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("department", &self.department)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Client-visible user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Emails are compared case-insensitively; store them trimmed and lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic shape check on an already-normalized email.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("invalid email format"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(())
}
