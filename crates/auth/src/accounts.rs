//! Account creation and administration.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use awap_core::UserId;

use crate::store::bounded;
use crate::user::{normalize_email, validate_email};
use crate::{
    AuthError, CredentialStore, HashCost, NewUser, Role, SessionClaims, UserRecord, UserStatus, password,
    require_role,
};

/// Department given to self-registered users who leave it blank.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Public self-registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

/// Admin-side user creation payload; every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

pub struct Accounts {
    store: Arc<dyn CredentialStore>,
    cost: HashCost,
    timeout: Duration,
}

impl Accounts {
    pub fn new(store: Arc<dyn CredentialStore>, cost: HashCost, timeout: Duration) -> Self {
        Self { store, cost, timeout }
    }

    /// Self-registration. Anyone may call this; `super_admin` cannot be
    /// self-assigned.
    pub async fn signup(&self, req: SignupRequest) -> Result<UserRecord, AuthError> {
        let (Some(name), Some(email), Some(plaintext)) = (
            non_blank(req.name.as_deref()),
            non_blank(req.email.as_deref()),
            req.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingCredentials);
        };

        let role = match non_blank(req.role.as_deref()) {
            Some(raw) => parse_role(&raw)?,
            None => Role::default(),
        };
        if role.is_super_admin() {
            tracing::warn!(email = %email, "signup attempted to self-assign super_admin");
            return Err(AuthError::InvalidInput("super_admin cannot be self-assigned".to_string()));
        }

        let department = non_blank(req.department.as_deref()).unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        let user = self.prepare(name, &email, plaintext, role, Some(department)).await?;
        let record = bounded("insert", self.timeout, self.store.insert(user)).await?;
        tracing::info!(user_id = %record.id, role = %record.role, "account registered");
        Ok(record)
    }

    /// Create a user with any role. Super admin only.
    pub async fn create_user(
        &self,
        actor: Option<&SessionClaims>,
        req: CreateUserRequest,
    ) -> Result<UserRecord, AuthError> {
        let actor = require_role(actor, Role::SuperAdmin)?;

        let (Some(name), Some(email), Some(plaintext), Some(role), Some(department)) = (
            non_blank(req.name.as_deref()),
            non_blank(req.email.as_deref()),
            req.password.filter(|p| !p.is_empty()),
            non_blank(req.role.as_deref()),
            non_blank(req.department.as_deref()),
        ) else {
            return Err(AuthError::InvalidInput("all fields are required".to_string()));
        };
        let role = parse_role(&role)?;

        let user = self.prepare(name, &email, plaintext, role, Some(department)).await?;
        let record = bounded("insert", self.timeout, self.store.insert(user)).await?;
        tracing::info!(actor_id = %actor.id, user_id = %record.id, role = %record.role, "user created");
        Ok(record)
    }

    pub async fn list_users(&self, actor: Option<&SessionClaims>) -> Result<Vec<UserRecord>, AuthError> {
        require_role(actor, Role::SuperAdmin)?;
        bounded("list", self.timeout, self.store.list()).await
    }

    pub async fn count_users(&self, actor: Option<&SessionClaims>) -> Result<u64, AuthError> {
        require_role(actor, Role::SuperAdmin)?;
        bounded("count", self.timeout, self.store.count()).await
    }

    /// Flip a user between active and disabled. Returns the updated record.
    pub async fn toggle_status(&self, actor: Option<&SessionClaims>, id: UserId) -> Result<UserRecord, AuthError> {
        let actor = require_role(actor, Role::SuperAdmin)?;

        let current = bounded("find_by_id", self.timeout, self.store.find_by_id(id))
            .await?
            .ok_or(AuthError::NotFound)?;
        let next = current.status.toggled();
        let updated = bounded("set_status", self.timeout, self.store.set_status(id, next)).await?;

        tracing::info!(actor_id = %actor.id, user_id = %id, status = %next, "user status changed");
        Ok(updated)
    }

    async fn prepare(
        &self,
        name: String,
        email: &str,
        plaintext: String,
        role: Role,
        department: Option<String>,
    ) -> Result<NewUser, AuthError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        if plaintext.chars().count() < password::MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let cost = self.cost;
        let password_hash = tokio::task::spawn_blocking(move || password::hash(&plaintext, cost))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AuthError::Internal
            })??;

        Ok(NewUser {
            email,
            name,
            password_hash,
            role,
            department,
            status: UserStatus::Active,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_role(raw: &str) -> Result<Role, AuthError> {
    raw.parse::<Role>().map_err(|e| AuthError::InvalidInput(e.to_string()))
}
