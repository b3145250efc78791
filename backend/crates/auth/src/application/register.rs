//! Register Use Case
//!
//! Self-service sign-up. The role is always `user`.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{IssuedToken, TokenService};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    account_role::AccountRole,
    email::Email,
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// Credentials for a new account (register and admin-create)
#[derive(Debug, Clone, Default)]
pub struct NewAccountInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct RegisterOutput {
    pub account: Account,
    pub token: IssuedToken,
}

pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: NewAccountInput) -> AuthResult<RegisterOutput> {
        let tokens = TokenService::new(self.config.clone());
        tokens.ensure_configured()?;

        let account = create_account(
            self.repo.as_ref(),
            &self.config,
            input,
            AccountRole::User,
        )
        .await?;

        let token = tokens.issue(account.id, account.role)?;

        tracing::info!(account_id = %account.id, username = %account.username, "Account registered");

        Ok(RegisterOutput { account, token })
    }
}

/// Validate, check uniqueness, hash and persist a new account
pub(crate) async fn create_account<R>(
    repo: &R,
    config: &AuthConfig,
    input: NewAccountInput,
    role: AccountRole,
) -> AuthResult<Account>
where
    R: AccountRepository,
{
    let (Some(username), Some(email), Some(password)) = (
        non_blank(input.username),
        non_blank(input.email),
        input.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::Validation(
            "username, email and password are required".to_string(),
        ));
    };

    let password = RawPassword::new(password)?;
    let username = Username::new(username)?;
    let email = Email::new(email)?;

    if repo.username_taken(&username, None).await? || repo.email_taken(&email, None).await? {
        return Err(AuthError::IdentityTaken);
    }

    let hash = AccountPassword::from_raw(&password, config.pepper())?;
    let account = Account::new(username, email, hash, role);
    repo.create(&account).await?;

    Ok(account)
}

/// `None` for missing or whitespace-only values
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
