//! Account Entity

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    account_password::AccountPassword, account_role::AccountRole, email::Email,
    username::Username,
};

/// Stored account. The password hash never leaves the application layer.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: Email,
    pub password: AccountPassword,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: Username,
        email: Email,
        password: AccountPassword,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            username,
            email,
            password,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_password(&mut self, password: AccountPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    pub fn current(&self) -> CurrentAccount {
        CurrentAccount {
            id: self.id,
            username: self.username.to_string(),
            email: self.email.to_string(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// The authenticated caller, as placed in request extensions by the guard
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

/// Accounts per role, for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub users: i64,
    pub admins: i64,
    pub owners: i64,
}
