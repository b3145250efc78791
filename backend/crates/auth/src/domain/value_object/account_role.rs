use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Account role
///
/// Ordered: `User < Admin < Owner`. Every access decision goes through
/// [`AccountRole::level`] / [`AccountRole::dominates`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    #[display("user")]
    User,
    #[display("admin")]
    Admin,
    #[display("owner")]
    Owner,
}

impl AccountRole {
    #[inline]
    pub const fn level(&self) -> u8 {
        match self {
            AccountRole::User => 0,
            AccountRole::Admin => 1,
            AccountRole::Owner => 2,
        }
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::User => "user",
            AccountRole::Admin => "admin",
            AccountRole::Owner => "owner",
        }
    }

    /// `true` when this role has at least the privileges of `other`
    #[inline]
    pub const fn dominates(&self, other: AccountRole) -> bool {
        self.level() >= other.level()
    }

    /// Admin or owner
    #[inline]
    pub const fn is_staff(&self) -> bool {
        self.dominates(AccountRole::Admin)
    }

    #[inline]
    pub const fn is_owner(&self) -> bool {
        matches!(self, AccountRole::Owner)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "user" => Some(AccountRole::User),
            "admin" => Some(AccountRole::Admin),
            "owner" => Some(AccountRole::Owner),
            _ => None,
        }
    }
}
