//! Category Entity

use chrono::{DateTime, Utc};
use kernel::id::CategoryId;
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

/// Maximum category name length (characters)
pub const CATEGORY_NAME_MAX_LENGTH: usize = 60;

/// Trimmed, non-empty, at most 60 characters. Uniqueness is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(raw: Option<&str>) -> CatalogResult<Self> {
        let name = raw.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(CatalogError::Validation("Category name is required".to_string()));
        }
        if name.chars().count() > CATEGORY_NAME_MAX_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Category name must be at most {CATEGORY_NAME_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: CategoryName) -> Self {
        Self {
            id: CategoryId::new(),
            name,
            created_at: Utc::now(),
        }
    }
}
