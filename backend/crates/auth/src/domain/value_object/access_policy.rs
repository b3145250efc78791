//! Access policies applied after authentication

use derive_more::Display;

use crate::domain::value_object::account_role::AccountRole;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessPolicy {
    #[display("authenticated")]
    Authenticated,
    #[display("admin-or-owner")]
    AdminOrOwner,
    #[display("owner-only")]
    OwnerOnly,
}

impl AccessPolicy {
    /// Minimum role admitted by this policy
    pub const fn minimum_role(&self) -> AccountRole {
        match self {
            AccessPolicy::Authenticated => AccountRole::User,
            AccessPolicy::AdminOrOwner => AccountRole::Admin,
            AccessPolicy::OwnerOnly => AccountRole::Owner,
        }
    }

    pub const fn allows(&self, role: AccountRole) -> bool {
        role.dominates(self.minimum_role())
    }

    pub fn check(&self, role: AccountRole) -> AuthResult<()> {
        if self.allows(role) {
            return Ok(());
        }
        Err(match self {
            AccessPolicy::Authenticated => AuthError::MissingToken,
            AccessPolicy::AdminOrOwner => AuthError::AdminOrOwnerRequired,
            AccessPolicy::OwnerOnly => AuthError::OwnerRequired,
        })
    }
}
