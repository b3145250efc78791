//! Session cookie attributes
//!
//! Secure/SameSite follow the request transport unless `COOKIE_SECURE`
//! forces them; Max-Age always equals the token lifetime.

use axum::http::{HeaderMap, HeaderValue};
use platform::client::is_secure_transport;
use platform::cookie::{CookieConfig, CookieSecurity, delete_cookie_header, set_cookie_header};

use crate::application::config::AuthConfig;

fn cookie_for(config: &AuthConfig, headers: &HeaderMap) -> CookieConfig {
    let security = CookieSecurity::resolve(config.cookie_secure, is_secure_transport(headers, false));
    CookieConfig::session(&config.cookie_name, config.token_ttl_secs(), security)
}

pub fn set_session_cookie(config: &AuthConfig, headers: &HeaderMap, token: &str) -> HeaderValue {
    set_cookie_header(&cookie_for(config, headers), token)
}

pub fn clear_session_cookie(config: &AuthConfig, headers: &HeaderMap) -> HeaderValue {
    delete_cookie_header(&cookie_for(config, headers))
}
