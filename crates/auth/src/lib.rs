//! `awap-auth`: credential authentication and role authorization boundary.
//!
//! This crate is decoupled from HTTP and from any particular database:
//! storage is reached through the [`CredentialStore`] trait and transports
//! consume [`Decision`]s and [`AuthError`]s.

pub mod accounts;
pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod error;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod store;
pub mod user;
pub mod view;

pub use accounts::{Accounts, CreateUserRequest, SignupRequest};
pub use authenticate::{AuthenticatedSession, Authenticator};
pub use authorize::{authorize, require_role, Decision, DenyReason, SIGN_IN_PATH};
pub use claims::{SessionClaims, SessionToken, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use password::{HashCost, MIN_PASSWORD_LEN, PasswordError};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{SessionIssuer, SessionReader, SessionSecret};
pub use store::{CredentialStore, StoreError};
pub use user::{NewUser, PublicUser, UserRecord, UserStatus};
pub use view::{ColorScheme, RoleIcon, RoleView};
