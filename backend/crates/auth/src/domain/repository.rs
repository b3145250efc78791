//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::AccountId;

use crate::domain::entity::{Account, RoleCounts};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::AuthResult;

/// Account repository trait
///
/// `create` and `update` must reject a duplicate username or email with
/// [`AuthError::IdentityTaken`](crate::error::AuthError::IdentityTaken), even
/// when the caller pre-checked, so a racing pair cannot both succeed.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>>;

    /// Exact username, or email compared lowercased
    async fn find_by_login(&self, identifier: &str) -> AuthResult<Option<Account>>;

    async fn find_many(&self, ids: &[AccountId]) -> AuthResult<Vec<Account>>;

    /// Is the username used by an account other than `except`?
    async fn username_taken(&self, username: &Username, except: Option<AccountId>)
    -> AuthResult<bool>;

    /// Is the email used by an account other than `except`?
    async fn email_taken(&self, email: &Email, except: Option<AccountId>) -> AuthResult<bool>;

    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: AccountId) -> AuthResult<bool>;

    /// Admins and owners; admins first, newest first within a role
    async fn list_staff(&self) -> AuthResult<Vec<Account>>;

    async fn count_by_role(&self) -> AuthResult<RoleCounts>;
}
