//! Audit Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::repository::{ActorDirectory, AuditRepository};
use crate::presentation::handlers::{self, AuditAppState};

/// Owner log view. Mounted under the admin prefix behind the owner-only guard.
pub fn audit_router<R, D>(repo: Arc<R>, directory: Arc<D>) -> Router
where
    R: AuditRepository + Send + Sync + 'static,
    D: ActorDirectory + Send + Sync + 'static,
{
    let state = AuditAppState { repo, directory };

    Router::new()
        .route("/logs", get(handlers::list_logs::<R, D>))
        .with_state(state)
}
