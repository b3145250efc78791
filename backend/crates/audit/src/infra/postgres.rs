//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, AuditEntryId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entry::{AuditEntry, TargetType};
use crate::domain::repository::AuditRepository;
use crate::error::AuditResult;

#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuditRepository for PgAuditRepository {
    async fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id,
                actor_id,
                action,
                target_type,
                target_id,
                target_label,
                details,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id.into_uuid())
        .bind(entry.actor_id.into_uuid())
        .bind(&entry.action)
        .bind(entry.target_type.as_str())
        .bind(entry.target_id)
        .bind(&entry.target_label)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT
                id,
                actor_id,
                action,
                target_type,
                target_id,
                target_label,
                details,
                created_at
            FROM audit_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    actor_id: Uuid,
    action: String,
    target_type: String,
    target_id: Option<Uuid>,
    target_label: String,
    details: String,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> AuditResult<AuditEntry> {
        Ok(AuditEntry {
            id: AuditEntryId::from_uuid(self.id),
            actor_id: AccountId::from_uuid(self.actor_id),
            action: self.action,
            target_type: self.target_type.parse::<TargetType>()?,
            target_id: self.target_id,
            target_label: self.target_label,
            details: self.details,
            created_at: self.created_at,
        })
    }
}
