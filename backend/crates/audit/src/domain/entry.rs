//! Audit Entry
//!
//! One row per privileged mutation. Entries are immutable once written.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, AuditEntryId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AuditError;

/// Maximum target label length (characters)
pub const TARGET_LABEL_MAX_LENGTH: usize = 140;

/// Maximum details length (characters)
pub const DETAILS_MAX_LENGTH: usize = 300;

/// Action tags written by the shop
pub mod actions {
    pub const CREATED_ADMIN: &str = "CREATED_ADMIN";
    pub const UPDATED_ADMIN: &str = "UPDATED_ADMIN";
    pub const DELETED_ADMIN: &str = "DELETED_ADMIN";
    pub const CREATED_CATEGORY: &str = "CREATED_CATEGORY";
    pub const UPDATED_CATEGORY: &str = "UPDATED_CATEGORY";
    pub const DELETED_CATEGORY: &str = "DELETED_CATEGORY";
    pub const CREATED_PRODUCT: &str = "CREATED_PRODUCT";
    pub const UPDATED_PRODUCT: &str = "UPDATED_PRODUCT";
    pub const DELETED_PRODUCT: &str = "DELETED_PRODUCT";
    pub const UPDATED_ORDER: &str = "UPDATED_ORDER";
}

/// Kind of resource an entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Admin,
    Category,
    Product,
    Order,
}

impl TargetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetType::Admin => "admin",
            TargetType::Category => "category",
            TargetType::Product => "product",
            TargetType::Order => "order",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(TargetType::Admin),
            "category" => Ok(TargetType::Category),
            "product" => Ok(TargetType::Product),
            "order" => Ok(TargetType::Order),
            other => Err(AuditError::UnknownTargetType(other.to_string())),
        }
    }
}

/// Persisted audit entry
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub actor_id: AccountId,
    pub action: String,
    pub target_type: TargetType,
    pub target_id: Option<Uuid>,
    pub target_label: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Entry as handed to the recorder, before bounds are applied
///
/// ## Examples
/// ```rust
/// use audit::{NewAuditEntry, TargetType, actions};
/// use kernel::id::{AccountId, CategoryId};
///
/// let actor = AccountId::new();
/// let category = CategoryId::new();
/// let entry = NewAuditEntry::new(actor, actions::CREATED_CATEGORY, TargetType::Category)
///     .target(category.into_uuid(), "Cakes")
///     .details("Created category Cakes");
/// ```
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: AccountId,
    pub action: String,
    pub target_type: TargetType,
    pub target_id: Option<Uuid>,
    pub target_label: String,
    pub details: String,
}

impl NewAuditEntry {
    pub fn new(actor_id: AccountId, action: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            actor_id,
            action: action.into(),
            target_type,
            target_id: None,
            target_label: String::new(),
            details: String::new(),
        }
    }

    pub fn target(mut self, id: Uuid, label: impl Into<String>) -> Self {
        self.target_id = Some(id);
        self.target_label = label.into();
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Stamp id/time and clamp the free-text fields
    pub fn into_entry(self) -> AuditEntry {
        AuditEntry {
            id: AuditEntryId::new(),
            actor_id: self.actor_id,
            action: self.action,
            target_type: self.target_type,
            target_id: self.target_id,
            target_label: clamp(&self.target_label, TARGET_LABEL_MAX_LENGTH),
            details: clamp(&self.details, DETAILS_MAX_LENGTH),
            created_at: Utc::now(),
        }
    }
}

/// Trim and cut to `max` characters (not bytes)
fn clamp(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}
