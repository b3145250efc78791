//! In-memory audit store (development and tests)

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::entry::AuditEntry;
use crate::domain::repository::AuditRepository;
use crate::error::AuditResult;

#[derive(Clone, Default)]
pub struct MemoryAuditRepository {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest-first entries once at least `count` are stored.
    ///
    /// Recorder writes are spawned; this polls for up to one second and
    /// then returns whatever is there.
    pub async fn settled(&self, count: usize) -> Vec<AuditEntry> {
        for _ in 0..100 {
            if self.entries.read().await.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.recent(usize::MAX).await.unwrap_or_default()
    }
}

impl AuditRepository for MemoryAuditRepository {
    async fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.entries.read().await;
        // Reverse first so equal timestamps keep last-written-first
        let mut recent: Vec<AuditEntry> = entries.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}
