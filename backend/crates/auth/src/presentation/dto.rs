//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Account, CurrentAccount};
use crate::domain::value_object::account_role::AccountRole;

// ============================================================================
// Accounts
// ============================================================================

/// Public account representation (never carries the hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.to_string(),
            email: account.email.to_string(),
            role: account.role,
            created_at: account.created_at,
        }
    }
}

impl From<CurrentAccount> for AccountResponse {
    fn from(account: CurrentAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

/// Register / admin-create request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial account update (`PUT /me`, `PUT /admins/{id}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountChangesRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: Option<String>,
    pub password: Option<String>,
    /// `user` (default) or `admin`
    pub account_type: Option<String>,
}

/// Register / login response; the token is also set as a cookie
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: AccountResponse,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: AccountResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: AccountResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ============================================================================
// Staff management
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AdminListResponse {
    pub admins: Vec<AccountResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub message: &'static str,
    pub admin: AccountResponse,
}
