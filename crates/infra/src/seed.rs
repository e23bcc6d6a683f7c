//! Development accounts, one per role.

use awap_auth::{CredentialStore, HashCost, NewUser, PasswordError, Role, StoreError, UserStatus};
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct DevUser {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub department: &'static str,
}

pub const DEV_USERS: &[DevUser] = &[
    DevUser {
        email: "admin@awap.com",
        password: "admin123",
        name: "Admin User",
        role: Role::SuperAdmin,
        department: "Administration",
    },
    DevUser {
        email: "manager@awap.com",
        password: "manager123",
        name: "Team Manager",
        role: Role::Manager,
        department: "Engineering",
    },
    DevUser {
        email: "hr@awap.com",
        password: "hr1234",
        name: "HR Manager",
        role: Role::Hr,
        department: "Human Resources",
    },
    DevUser {
        email: "lnd@awap.com",
        password: "lnd123",
        name: "L&D Specialist",
        role: Role::Lnd,
        department: "Learning & Development",
    },
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Insert [`DEV_USERS`]; accounts that already exist are left untouched.
/// Returns how many were created.
pub async fn seed_dev_users(store: &dyn CredentialStore, cost: HashCost) -> Result<usize, SeedError> {
    let mut created = 0;
    for user in DEV_USERS {
        let new_user = NewUser {
            email: user.email.to_string(),
            name: user.name.to_string(),
            password_hash: awap_auth::password::hash(user.password, cost)?,
            role: user.role,
            department: Some(user.department.to_string()),
            status: UserStatus::Active,
        };
        match store.insert(new_user).await {
            Ok(record) => {
                created += 1;
                tracing::info!(user_id = %record.id, email = user.email, role = %user.role, "seeded dev user");
            }
            Err(StoreError::Duplicate) => {
                tracing::debug!(email = user.email, "dev user already present");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(created)
}
