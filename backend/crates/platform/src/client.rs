//! Client identification utilities
//!
//! Common functions for reading client/transport facts from HTTP headers.

use axum::http::{HeaderMap, header};

/// First value of `X-Forwarded-Proto`, lowercased
///
/// Proxies may append (`https, http`); the left-most entry is the one the
/// client actually used.
pub fn forwarded_proto(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

/// Whether the request reached us over HTTPS
///
/// `direct_tls` is true when the listener itself terminated TLS.
pub fn is_secure_transport(headers: &HeaderMap, direct_tls: bool) -> bool {
    direct_tls || forwarded_proto(headers).as_deref() == Some("https")
}

/// `Origin` header as sent by the browser, without a trailing slash
///
/// Only `http://` and `https://` origins are returned.
pub fn extract_origin(headers: &HeaderMap) -> Option<String> {
    let origin = headers.get(header::ORIGIN)?.to_str().ok()?.trim();
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return None;
    }
    Some(origin.trim_end_matches('/').to_string())
}
