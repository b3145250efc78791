//! Actor Directory Adapter
//!
//! Lets the audit listing resolve actor ids through the account store.

use std::collections::HashMap;
use std::sync::Arc;

use audit::{ActorDirectory, ActorSummary, AuditError, AuditResult};
use kernel::id::AccountId;

use crate::domain::repository::AccountRepository;

pub struct AccountDirectory<R>(Arc<R>);

impl<R> AccountDirectory<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self(repo)
    }
}

impl<R> ActorDirectory for AccountDirectory<R>
where
    R: AccountRepository + Send + Sync,
{
    async fn find_actors(
        &self,
        ids: &[AccountId],
    ) -> AuditResult<HashMap<AccountId, ActorSummary>> {
        let accounts = self
            .0
            .find_many(ids)
            .await
            .map_err(|e| AuditError::Directory(e.to_string()))?;

        Ok(accounts
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    ActorSummary {
                        id: a.id,
                        username: a.username.to_string(),
                        role: a.role.code().to_string(),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::register::{NewAccountInput, create_account};
    use crate::domain::value_object::account_role::AccountRole;
    use crate::infra::memory::MemoryAccountRepository;

    #[tokio::test]
    async fn test_unknown_ids_are_absent() {
        let repo = Arc::new(MemoryAccountRepository::new());
        let admin = create_account(
            repo.as_ref(),
            &AuthConfig::default(),
            NewAccountInput {
                username: Some("mia".into()),
                email: Some("mia@x.com".into()),
                password: Some("password1".into()),
            },
            AccountRole::Admin,
        )
        .await
        .unwrap();

        let directory = AccountDirectory::new(repo);
        let found = directory
            .find_actors(&[admin.id, AccountId::new()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[&admin.id].username, "mia");
        assert_eq!(found[&admin.id].role, "admin");
    }
}
