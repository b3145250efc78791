//! Username Value Object
//!
//! Public handle used for login and display.
//!
//! ## Invariants
//! - NFKC normalized, surrounding whitespace trimmed
//! - 3 to 30 characters
//! - no control characters
//!
//! Comparison is exact (case-sensitive), matching the unique index.

use serde::Serialize;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AuthError, AuthResult};

/// Minimum length for username (in characters)
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum length for username (in characters)
pub const USERNAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(input: impl AsRef<str>) -> AuthResult<Self> {
        let normalized: String = input.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }

        let len = trimmed.chars().count();
        if len < USERNAME_MIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username must contain at least {} characters",
                USERNAME_MIN_LENGTH
            )));
        }
        if len > USERNAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username must contain at most {} characters",
                USERNAME_MAX_LENGTH
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(AuthError::Validation(
                "Username contains invalid characters".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(Username::new("  alice ").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_length_bounds() {
        assert!(Username::new("ab").is_err());
        assert!(Username::new("abc").is_ok());
        assert!(Username::new("a".repeat(30)).is_ok());
        assert!(Username::new("a".repeat(31)).is_err());
        // Counted in characters, not bytes
        assert!(Username::new("ééé").is_ok());
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(Username::new("Alice").unwrap().as_str(), "Alice");
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(Username::new("ali\u{0007}ce").is_err());
    }
}
