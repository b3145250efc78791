//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Default sliding-renewal window (24 hours)
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(24 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// HS256 signing secret. `None` makes issuing and verifying fail.
    pub jwt_secret: Option<String>,
    /// Token lifetime, also used as cookie Max-Age
    pub token_ttl: Duration,
    /// Remaining validity below which a token is re-issued
    pub refresh_window: Duration,
    /// Forced cookie Secure flag; `None` follows the request transport
    pub cookie_secure: Option<bool>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            jwt_secret: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            refresh_window: DEFAULT_REFRESH_WINDOW,
            cookie_secure: None,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Create config with a random signing secret (tests, throwaway instances)
    pub fn with_random_secret() -> Self {
        use rand::Rng;
        use rand::distr::Alphanumeric;

        let secret: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();
        Self::with_secret(secret)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Parse a `JWT_EXPIRES_IN` value: `7d`, `12h`, `30m`, `45s` or bare seconds
pub fn parse_token_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (digits, unit_secs) = match raw.char_indices().last()? {
        (i, 'd') => (&raw[..i], 86_400),
        (i, 'h') => (&raw[..i], 3_600),
        (i, 'm') => (&raw[..i], 60),
        (i, 's') => (&raw[..i], 1),
        _ => (raw, 1),
    };

    let value: u64 = digits.trim().parse().ok()?;
    if value == 0 {
        return None;
    }
    value.checked_mul(unit_secs).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_ttl() {
        assert_eq!(parse_token_ttl("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_token_ttl("12h"), Some(Duration::from_secs(43_200)));
        assert_eq!(parse_token_ttl("30m"), Some(Duration::from_secs(1_800)));
        assert_eq!(parse_token_ttl("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_token_ttl("3600"), Some(Duration::from_secs(3_600)));
        assert_eq!(parse_token_ttl("0"), None);
        assert_eq!(parse_token_ttl("soon"), None);
        assert_eq!(parse_token_ttl(""), None);
    }

    #[test]
    fn test_random_secret() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert!(a.jwt_secret.is_some());
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }
}
