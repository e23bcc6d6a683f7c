//! Postgres connection and schema bootstrap.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        name        TEXT NOT NULL,
        password    TEXT NOT NULL,
        role        TEXT NOT NULL DEFAULT 'hr',
        department  TEXT,
        status      TEXT DEFAULT 'active',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs (
        id             BIGSERIAL PRIMARY KEY,
        admin_user_id  BIGINT,
        action_type    TEXT NOT NULL,
        target_type    TEXT NOT NULL,
        target_id      BIGINT,
        details        TEXT,
        status         TEXT NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users (lower(email))",
    "CREATE INDEX IF NOT EXISTS audit_logs_created_at_idx ON audit_logs (created_at DESC)",
];

/// Open a pool; `acquire_timeout` bounds how long a request waits for a
/// connection.
pub async fn connect(url: &str, acquire_timeout: Duration) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect(url)
        .await
}

/// Create the `users` and `audit_logs` tables if they are missing.
///
/// Email uniqueness is enforced on `lower(email)`; an existing table holding
/// two emails that differ only by case fails here and must be cleaned first.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("database schema ensured");
    Ok(())
}
