//! Postgres-backed user store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | n/a (insert guard matched a case-variant email) | n/a | `Duplicate` |
//! | Database (other) | any other | `Unavailable` |
//! | PoolClosed / Io / Tls / PoolTimedOut | n/a | `Unavailable` |
//! | ColumnDecode / unknown role string | n/a | `Corrupt` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use awap_auth::{CredentialStore, NewUser, Role, StoreError, UserRecord, UserStatus};
use awap_core::UserId;

const USER_COLUMNS: &str = "id, email, name, password, role, department, status, created_at";

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresUserStore {
    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = $1 LIMIT 1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self, user), fields(email = %user.email, role = %user.role), err)]
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        // The guard covers tables created without `users_email_lower_idx`.
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name, password, role, department, status) \
             SELECT $1, $2, $3, $4, $5, $6 \
             WHERE NOT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1)) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.department.as_deref())
        .bind(user.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?
        .ok_or(StoreError::Duplicate)?;

        user_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(user_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self), err)]
    async fn set_status(&self, id: UserId, status: UserStatus) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(&format!("UPDATE users SET status = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"))
            .bind(id.get())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_status", e))?
            .ok_or(StoreError::NotFound)?;

        user_from_row(&row)
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Corrupt(format!("failed to decode user row: {e}"));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let role: Option<String> = row.try_get("role").map_err(decode)?;
    let status: Option<String> = row.try_get("status").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    let role = match role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| StoreError::Corrupt(format!("user {id}: {e}")))?,
    };
    let status =
        UserStatus::from_column(status.as_deref()).map_err(|e| StoreError::Corrupt(format!("user {id}: {e}")))?;

    Ok(UserRecord {
        id: UserId::new(id),
        email: row.try_get("email").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        password_hash: row.try_get("password").map_err(decode)?,
        role,
        department: row.try_get("department").map_err(decode)?,
        status,
        created_at,
    })
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Duplicate
            } else {
                StoreError::Unavailable(format!("database error in {operation}: {}", db_err.message()))
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("decode error in {operation}: {err}"))
        }
        sqlx::Error::PoolClosed => StoreError::Unavailable(format!("connection pool closed in {operation}")),
        _ => StoreError::Unavailable(format!("sqlx error in {operation}: {err}")),
    }
}
