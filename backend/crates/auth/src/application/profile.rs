//! Profile Use Case
//!
//! Partial update of username/email/password, shared by `PUT /me` and the
//! owner's admin edit.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::register::non_blank;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
    username::Username,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AccountChanges {
    /// Drop blank fields
    pub(crate) fn normalized(self) -> Self {
        Self {
            username: non_blank(self.username),
            email: non_blank(self.email),
            password: self.password.filter(|p| !p.is_empty()),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

pub struct UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, account_id: AccountId, changes: AccountChanges) -> AuthResult<Account> {
        let changes = changes.normalized();
        if changes.is_empty() {
            return Err(AuthError::Validation("At least one field is required".to_string()));
        }

        let mut account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        apply_changes(self.repo.as_ref(), &self.config, &mut account, changes).await?;
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.id, "Profile updated");

        Ok(account)
    }
}

/// Validate and apply non-empty changes; uniqueness excludes the account itself
pub(crate) async fn apply_changes<R>(
    repo: &R,
    config: &AuthConfig,
    account: &mut Account,
    changes: AccountChanges,
) -> AuthResult<()>
where
    R: AccountRepository,
{
    if let Some(raw) = changes.username {
        let username = Username::new(raw)?;
        if username != account.username {
            if repo.username_taken(&username, Some(account.id)).await? {
                return Err(AuthError::UsernameTaken);
            }
            account.set_username(username);
        }
    }

    if let Some(raw) = changes.email {
        let email = Email::new(raw)?;
        if email != account.email {
            if repo.email_taken(&email, Some(account.id)).await? {
                return Err(AuthError::EmailTaken);
            }
            account.set_email(email);
        }
    }

    if let Some(raw) = changes.password {
        let password = RawPassword::new(raw)?;
        account.set_password(AccountPassword::from_raw(&password, config.pepper())?);
    }

    Ok(())
}
