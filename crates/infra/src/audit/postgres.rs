use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use awap_core::{AuditEntryId, UserId};

use super::{AuditEntry, AuditError, AuditLog, MAX_RECENT, NewAuditEntry};

#[derive(Debug, Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    #[instrument(skip(self, entry), fields(action = entry.action.as_str()), err)]
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntryId, AuditError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO audit_logs (admin_user_id, action_type, target_type, target_id, details, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(entry.admin_user_id.get())
        .bind(entry.action.as_str())
        .bind(entry.target_type)
        .bind(entry.target_id)
        .bind(&entry.details)
        .bind(entry.outcome.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuditError::Unavailable(format!("insert audit entry: {e}")))?;

        Ok(AuditEntryId::new(id))
    }

    #[instrument(skip(self), err)]
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let limit = limit.min(MAX_RECENT) as i64;
        let rows = sqlx::query(
            r#"
            SELECT
                al.id,
                al.admin_user_id,
                u.name AS admin_name,
                al.action_type,
                al.target_type,
                al.target_id,
                al.details,
                al.status,
                al.created_at
            FROM audit_logs al
            LEFT JOIN users u ON al.admin_user_id = u.id
            ORDER BY al.created_at DESC, al.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::Unavailable(format!("load audit entries: {e}")))?;

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &PgRow) -> Result<AuditEntry, AuditError> {
    let decode = |e: sqlx::Error| AuditError::Corrupt(e.to_string());

    let admin_user_id: Option<i64> = row.try_get("admin_user_id").map_err(decode)?;
    Ok(AuditEntry {
        id: AuditEntryId::new(row.try_get("id").map_err(decode)?),
        admin_user_id: admin_user_id.map(UserId::new),
        admin_name: row.try_get("admin_name").map_err(decode)?,
        action_type: row.try_get("action_type").map_err(decode)?,
        target_type: row.try_get("target_type").map_err(decode)?,
        target_id: row.try_get("target_id").map_err(decode)?,
        details: row.try_get("details").map_err(decode)?,
        status: row.try_get("status").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}
