//! Cookie Management Infrastructure
//!
//! Session cookie building/parsing. The Secure and SameSite attributes are
//! derived from the effective transport of the request unless forced by
//! configuration.

use axum::http::{HeaderMap, HeaderValue, header};

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Secure/SameSite pair for one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSecurity {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSecurity {
    /// HTTPS gets `Secure; SameSite=None`, plain HTTP gets `SameSite=Lax`
    pub fn for_transport(secure: bool) -> Self {
        if secure {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
            }
        }
    }

    /// Apply the configured override, falling back to the detected transport
    pub fn resolve(forced: Option<bool>, transport_secure: bool) -> Self {
        Self::for_transport(forced.unwrap_or(transport_secure))
    }
}

/// Parse a `COOKIE_SECURE`-style override. Anything but `true`/`false` means auto.
pub fn parse_secure_override(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") => Some(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "token".to_string(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// HTTP-only cookie at `/` with the given lifetime and transport attributes
    pub fn session(name: impl Into<String>, max_age_secs: i64, security: CookieSecurity) -> Self {
        Self {
            name: name.into(),
            secure: security.secure,
            same_site: security.same_site,
            max_age_secs: Some(max_age_secs),
            ..Default::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    ///
    /// Carries the same attributes as the original cookie, otherwise browsers
    /// keep a `SameSite=None` cookie around.
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}; Max-Age=0; Expires={}", self.path, EPOCH_EXPIRES));
        cookie
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            let value = value.trim();

            if key == name && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> HeaderValue {
    HeaderValue::from_str(&config.build_set_cookie(value))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Create a Set-Cookie header value that removes the cookie
pub fn delete_cookie_header(config: &CookieConfig) -> HeaderValue {
    HeaderValue::from_str(&config.build_delete_cookie())
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "test".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            max_age_secs: Some(3600),
        };

        let cookie = config.build_set_cookie("value123");
        assert!(cookie.contains("test=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_security_follows_transport() {
        let plain = CookieSecurity::for_transport(false);
        assert!(!plain.secure);
        assert_eq!(plain.same_site, SameSite::Lax);

        let tls = CookieSecurity::for_transport(true);
        assert!(tls.secure);
        assert_eq!(tls.same_site, SameSite::None);
    }

    #[test]
    fn test_security_override_wins() {
        assert!(CookieSecurity::resolve(Some(true), false).secure);
        assert!(!CookieSecurity::resolve(Some(false), true).secure);
        assert!(CookieSecurity::resolve(None, true).secure);
    }

    #[test]
    fn test_parse_secure_override() {
        assert_eq!(parse_secure_override(Some("true")), Some(true));
        assert_eq!(parse_secure_override(Some("FALSE")), Some(false));
        assert_eq!(parse_secure_override(Some("auto")), None);
        assert_eq!(parse_secure_override(None), None);
    }

    #[test]
    fn test_delete_cookie_keeps_attributes() {
        let config = CookieConfig::session("token", 604800, CookieSecurity::for_transport(true));
        let cookie = config.build_delete_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; token=abc123; other=xyz"),
        );

        assert_eq!(extract_cookie(&headers, "token"), Some("abc123".to_string()));
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(extract_cookie(&headers, "token"), None);
    }
}
