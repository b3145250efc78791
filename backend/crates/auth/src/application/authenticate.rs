//! Authenticate Use Case
//!
//! Token → account, plus the sliding-renewal decision. Runs once per
//! guarded request.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::token::{IssuedToken, TokenService, needs_refresh};
use crate::domain::entity::CurrentAccount;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

pub struct Authenticated {
    pub account: CurrentAccount,
    /// Set when the presented token was inside the refresh window
    pub renewed: Option<IssuedToken>,
}

pub struct AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<Authenticated> {
        self.execute_at(token, Utc::now()).await
    }

    pub async fn execute_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Authenticated> {
        let tokens = TokenService::new(self.config.clone());
        let verified = tokens.verify(token)?;

        // Store failures are not the caller's fault
        let account = self
            .repo
            .find_by_id(verified.account_id)
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?
            .ok_or(AuthError::AccountGone)?;

        let renewed = if needs_refresh(verified.expires_at, now, self.config.refresh_window) {
            let issued = tokens.issue_at(account.id, account.role, now)?;
            tracing::debug!(account_id = %account.id, "Session token renewed");
            Some(issued)
        } else {
            None
        };

        Ok(Authenticated {
            account: account.current(),
            renewed,
        })
    }
}
