//! Password Hashing
//!
//! Argon2id in PHC string format. The optional pepper is passed to Argon2
//! as its secret key rather than concatenated to the password, so a stored
//! hash is useless without it.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Upper bound keeps hashing cost predictable
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password must contain at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,

    #[error("Password must contain at most {} characters", MAX_PASSWORD_LENGTH)]
    TooLong,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed")]
    MalformedHash,
}

impl PasswordError {
    /// Caller input problem rather than a server fault
    pub fn is_policy(&self) -> bool {
        matches!(self, PasswordError::TooShort | PasswordError::TooLong)
    }
}

/// Clear text secret, NFKC-normalized and wiped on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// New password chosen by the user; length policy applies
    pub fn checked(raw: String) -> Result<Self, PasswordError> {
        let secret = Self::unchecked(raw);
        match secret.0.chars().count() {
            n if n < MIN_PASSWORD_LENGTH => Err(PasswordError::TooShort),
            n if n > MAX_PASSWORD_LENGTH => Err(PasswordError::TooLong),
            _ => Ok(secret),
        }
    }

    /// Login attempt; never reveals the policy
    pub fn unchecked(mut raw: String) -> Self {
        let normalized = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

/// Stored Argon2id hash
#[derive(Clone, PartialEq, Eq)]
pub struct PhcHash(String);

impl PhcHash {
    pub fn create(secret: &Secret, pepper: Option<&[u8]>) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher(pepper)?
            .hash_password(secret.0.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Restore a hash read from storage
    pub fn parse(phc: impl Into<String>) -> Result<Self, PasswordError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordError::MalformedHash)?;
        Ok(Self(phc))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, secret: &Secret, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        let Ok(argon2) = hasher(pepper) else {
            return false;
        };
        argon2.verify_password(secret.0.as_bytes(), &parsed).is_ok()
    }
}

impl fmt::Debug for PhcHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PhcHash([HASH])")
    }
}

fn hasher(pepper: Option<&[u8]>) -> Result<Argon2<'_>, PasswordError> {
    match pepper {
        Some(key) => {
            Argon2::new_with_secret(key, Algorithm::Argon2id, Version::V0x13, Params::default())
                .map_err(|e| PasswordError::Hashing(e.to_string()))
        }
        None => Ok(Argon2::default()),
    }
}
