//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::application::ListAuditLogsUseCase;
use crate::domain::repository::{ActorDirectory, AuditRepository};
use crate::error::AuditResult;
use crate::presentation::dto::AuditLogListResponse;

pub struct AuditAppState<R, D> {
    pub repo: Arc<R>,
    pub directory: Arc<D>,
}

// Manual impl: derive would require `R: Clone` and `D: Clone`
impl<R, D> Clone for AuditAppState<R, D> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            directory: self.directory.clone(),
        }
    }
}

/// GET /api/admin/logs
pub async fn list_logs<R, D>(
    State(state): State<AuditAppState<R, D>>,
) -> AuditResult<Json<AuditLogListResponse>>
where
    R: AuditRepository + Send + Sync + 'static,
    D: ActorDirectory + Send + Sync + 'static,
{
    let logs = ListAuditLogsUseCase::new(state.repo.clone(), state.directory.clone())
        .execute()
        .await?;

    Ok(Json(AuditLogListResponse {
        logs: logs.into_iter().map(Into::into).collect(),
    }))
}
