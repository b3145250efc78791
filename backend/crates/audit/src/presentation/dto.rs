//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::AuditEntryId;
use serde::Serialize;
use uuid::Uuid;

use crate::application::AuditLogView;
use crate::domain::entry::TargetType;
use crate::domain::repository::ActorSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    #[serde(rename = "_id")]
    pub id: AuditEntryId,
    pub actor: Option<ActorSummary>,
    pub action: String,
    pub target_type: TargetType,
    pub target_id: Option<Uuid>,
    pub target_label: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogView> for AuditLogResponse {
    fn from(view: AuditLogView) -> Self {
        let AuditLogView { entry, actor } = view;
        Self {
            id: entry.id,
            actor,
            action: entry.action,
            target_type: entry.target_type,
            target_id: entry.target_id,
            target_label: entry.target_label,
            details: entry.details,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogResponse>,
}
