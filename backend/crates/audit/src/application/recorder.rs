//! Audit Recorder
//!
//! Dispatches entry writes onto the runtime so the calling request never
//! waits on, or fails because of, the audit store.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::entry::{AuditEntry, NewAuditEntry};
use crate::domain::repository::AuditRepository;
use crate::error::AuditResult;

type AppendFuture = Pin<Box<dyn Future<Output = AuditResult<()>> + Send>>;
type AppendFn = dyn Fn(AuditEntry) -> AppendFuture + Send + Sync;

/// Fire-and-forget audit writer
///
/// The repository type is erased so that domain states holding a recorder
/// stay generic only over their own stores.
#[derive(Clone)]
pub struct AuditRecorder {
    append: Arc<AppendFn>,
}

impl AuditRecorder {
    pub fn new<R>(repo: Arc<R>) -> Self
    where
        R: AuditRepository + Send + Sync + 'static,
    {
        let append = move |entry: AuditEntry| -> AppendFuture {
            let repo = repo.clone();
            Box::pin(async move { repo.append(&entry).await })
        };
        Self {
            append: Arc::new(append),
        }
    }

    /// Record an entry in the background
    ///
    /// Failures are logged at warn level and discarded. The handle is only
    /// useful to tests that need to observe the write.
    pub fn record(&self, entry: NewAuditEntry) -> JoinHandle<()> {
        let entry = entry.into_entry();
        let action = entry.action.clone();
        let actor_id = entry.actor_id;
        let write = (self.append)(entry);

        tokio::spawn(async move {
            if let Err(e) = write.await {
                tracing::warn!(error = %e, action = %action, actor_id = %actor_id, "Failed to write audit log entry");
            }
        })
    }
}
