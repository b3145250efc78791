//! Account Password Value Object
//!
//! Wraps `platform::password`; policy violations surface as validation
//! errors, hashing faults as internal ones.

use platform::password::{PasswordError, PhcHash, Secret};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user (zeroized on drop)
pub struct RawPassword(Secret);

impl RawPassword {
    /// New password, policy enforced
    pub fn new(raw: String) -> AuthResult<Self> {
        Ok(Self(Secret::checked(raw)?))
    }

    /// Login attempt, no policy check
    pub fn attempt(raw: String) -> Self {
        Self(Secret::unchecked(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored Argon2id hash
#[derive(Clone, PartialEq, Eq)]
pub struct AccountPassword(PhcHash);

impl AccountPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        Ok(Self(PhcHash::create(&raw.0, pepper)?))
    }

    pub fn from_db(phc: impl Into<String>) -> AuthResult<Self> {
        PhcHash::parse(phc).map(Self).map_err(|e| match e {
            PasswordError::MalformedHash => {
                AuthError::Internal("Stored password hash unreadable".to_string())
            }
            other => other.into(),
        })
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_str()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.matches(&raw.0, pepper)
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_message() {
        let err = RawPassword::new("short".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Password must contain at least 8 characters");
    }

    #[test]
    fn test_hash_verify() {
        let raw = RawPassword::new("password1".to_string()).unwrap();
        let stored = AccountPassword::from_raw(&raw, None).unwrap();
        assert!(stored.verify(&RawPassword::attempt("password1".to_string()), None));
        assert!(!stored.verify(&RawPassword::attempt("password2".to_string()), None));

        let restored = AccountPassword::from_db(stored.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, None));
    }
}
