//! List Audit Logs Use Case

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entry::AuditEntry;
use crate::domain::repository::{ActorDirectory, ActorSummary, AuditRepository};
use crate::error::AuditResult;

/// Number of entries returned by the owner log view
pub const LOG_LIST_LIMIT: usize = 300;

/// Entry with its actor resolved (`None` once the account is gone)
#[derive(Debug, Clone)]
pub struct AuditLogView {
    pub entry: AuditEntry,
    pub actor: Option<ActorSummary>,
}

pub struct ListAuditLogsUseCase<R, D>
where
    R: AuditRepository,
    D: ActorDirectory,
{
    repo: Arc<R>,
    directory: Arc<D>,
}

impl<R, D> ListAuditLogsUseCase<R, D>
where
    R: AuditRepository,
    D: ActorDirectory,
{
    pub fn new(repo: Arc<R>, directory: Arc<D>) -> Self {
        Self { repo, directory }
    }

    pub async fn execute(&self) -> AuditResult<Vec<AuditLogView>> {
        let entries = self.repo.recent(LOG_LIST_LIMIT).await?;

        let mut actor_ids: Vec<AccountId> = entries.iter().map(|e| e.actor_id).collect();
        actor_ids.sort();
        actor_ids.dedup();

        let actors = self.directory.find_actors(&actor_ids).await?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let actor = actors.get(&entry.actor_id).cloned();
                AuditLogView { entry, actor }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::domain::entry::{NewAuditEntry, TargetType, actions};
    use crate::infra::memory::MemoryAuditRepository;

    struct StaticDirectory(HashMap<AccountId, ActorSummary>);

    impl ActorDirectory for StaticDirectory {
        async fn find_actors(
            &self,
            ids: &[AccountId],
        ) -> AuditResult<HashMap<AccountId, ActorSummary>> {
            Ok(ids
                .iter()
                .filter_map(|id| self.0.get(id).map(|a| (*id, a.clone())))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_newest_first_with_actors() {
        let repo = Arc::new(MemoryAuditRepository::new());
        let owner = AccountId::new();
        let deleted_admin = AccountId::new();

        let first = NewAuditEntry::new(owner, actions::CREATED_ADMIN, TargetType::Admin).into_entry();
        let mut second =
            NewAuditEntry::new(deleted_admin, actions::DELETED_PRODUCT, TargetType::Product)
                .into_entry();
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        repo.append(&first).await.unwrap();
        repo.append(&second).await.unwrap();

        let directory = StaticDirectory(HashMap::from([(
            owner,
            ActorSummary {
                id: owner,
                username: "boss".to_string(),
                role: "owner".to_string(),
            },
        )]));

        let logs = ListAuditLogsUseCase::new(repo, Arc::new(directory))
            .execute()
            .await
            .unwrap();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].entry.action, actions::DELETED_PRODUCT);
        assert!(logs[0].actor.is_none());
        assert_eq!(logs[1].actor.as_ref().unwrap().username, "boss");
    }

    #[tokio::test]
    async fn test_limited_to_most_recent() {
        let repo = Arc::new(MemoryAuditRepository::new());
        let actor = AccountId::new();
        for _ in 0..(LOG_LIST_LIMIT + 5) {
            repo.append(
                &NewAuditEntry::new(actor, actions::UPDATED_ORDER, TargetType::Order).into_entry(),
            )
            .await
            .unwrap();
        }

        let logs = ListAuditLogsUseCase::new(repo, Arc::new(StaticDirectory(HashMap::new())))
            .execute()
            .await
            .unwrap();
        assert_eq!(logs.len(), LOG_LIST_LIMIT);
    }
}
