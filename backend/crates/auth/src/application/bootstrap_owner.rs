//! Owner Bootstrap
//!
//! Creates the single owner account at startup when none exists yet.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::register::{NewAccountInput, create_account};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::account_role::AccountRole;
use crate::error::AuthResult;

pub struct BootstrapOwnerUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> BootstrapOwnerUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns the created owner, or `None` when one already exists
    pub async fn execute(&self, credentials: NewAccountInput) -> AuthResult<Option<Account>> {
        if self.repo.count_by_role().await?.owners > 0 {
            tracing::debug!("Owner account already present, bootstrap skipped");
            return Ok(None);
        }

        let owner =
            create_account(self.repo.as_ref(), &self.config, credentials, AccountRole::Owner)
                .await?;
        tracing::info!(account_id = %owner.id, username = %owner.username, "Owner account bootstrapped");

        Ok(Some(owner))
    }
}
