//! `CredentialStore` implementations.
//!
//! - `in_memory`: dev/test backend guarded by an `RwLock`.
//! - `postgres`: persistent backend over a `sqlx::PgPool`.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;
