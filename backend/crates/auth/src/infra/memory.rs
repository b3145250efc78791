//! In-memory account store (development and tests)
//!
//! Enforces the same uniqueness rules as the SQL indexes: exact username,
//! lowercased email.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::AccountId;
use tokio::sync::RwLock;

use crate::domain::entity::{Account, RoleCounts};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_role::AccountRole, email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct MemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn collides(existing: &Account, candidate: &Account) -> bool {
    existing.id != candidate.id
        && (existing.username == candidate.username || existing.email == candidate.email)
}

impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| collides(a, account)) {
            return Err(AuthError::IdentityTaken);
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_login(&self, identifier: &str) -> AuthResult<Option<Account>> {
        let lowered = identifier.to_lowercase();
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.username.as_str() == identifier || a.email.as_str() == lowered)
            .cloned())
    }

    async fn find_many(&self, ids: &[AccountId]) -> AuthResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(ids.iter().filter_map(|id| accounts.get(id).cloned()).collect())
    }

    async fn username_taken(
        &self,
        username: &Username,
        except: Option<AccountId>,
    ) -> AuthResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .any(|a| Some(a.id) != except && &a.username == username))
    }

    async fn email_taken(&self, email: &Email, except: Option<AccountId>) -> AuthResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .any(|a| Some(a.id) != except && &a.email == email))
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(AuthError::UserNotFound);
        }
        if accounts.values().any(|a| collides(a, account)) {
            return Err(AuthError::IdentityTaken);
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> AuthResult<bool> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }

    async fn list_staff(&self) -> AuthResult<Vec<Account>> {
        let mut staff: Vec<Account> = self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.role.is_staff())
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.role.cmp(&b.role).then(b.created_at.cmp(&a.created_at)));
        Ok(staff)
    }

    async fn count_by_role(&self) -> AuthResult<RoleCounts> {
        let accounts = self.accounts.read().await;
        let mut counts = RoleCounts::default();
        for account in accounts.values() {
            match account.role {
                AccountRole::User => counts.users += 1,
                AccountRole::Admin => counts.admins += 1,
                AccountRole::Owner => counts.owners += 1,
            }
        }
        Ok(counts)
    }
}
