//! Login Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::register::non_blank;
use crate::application::token::{IssuedToken, TokenService};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::account_password::RawPassword;
use crate::error::{AuthError, AuthResult};

/// Which login form was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    User,
    Admin,
}

impl AccountType {
    /// Missing means `user`; anything else is rejected
    pub fn parse(raw: Option<&str>) -> AuthResult<Self> {
        match raw {
            None | Some("user") => Ok(AccountType::User),
            Some("admin") => Ok(AccountType::Admin),
            Some(_) => Err(AuthError::InvalidAccountType),
        }
    }
}

#[derive(Debug)]
pub struct LoginInput {
    pub username_or_email: Option<String>,
    pub password: Option<String>,
    pub account_type: Option<String>,
}

pub struct LoginOutput {
    pub account: Account,
    pub token: IssuedToken,
}

pub struct LoginUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Credentials are checked before the account type, so a wrong password
    /// never reveals whether the account is staff.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let account_type = AccountType::parse(input.account_type.as_deref())?;

        let (Some(identifier), Some(password)) = (
            non_blank(input.username_or_email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::Validation(
                "username/email and password are required".to_string(),
            ));
        };

        let account = self
            .repo
            .find_by_login(identifier.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let attempt = RawPassword::attempt(password);
        if !account.password.verify(&attempt, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        if account_type == AccountType::Admin && !account.role.is_staff() {
            return Err(AuthError::AdminAccountRequired);
        }

        let token = TokenService::new(self.config.clone()).issue(account.id, account.role)?;

        tracing::info!(account_id = %account.id, role = %account.role, "Login succeeded");

        Ok(LoginOutput { account, token })
    }
}
