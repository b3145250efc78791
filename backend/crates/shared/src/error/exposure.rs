//! Error exposure policy
//!
//! Decides how much of an error reaches the client. Set once at startup
//! from the environment; read by the terminal renderer.

use std::sync::atomic::{AtomicBool, Ordering};

static PRODUCTION: AtomicBool = AtomicBool::new(false);

/// Switch the renderer into production mode.
///
/// In production, 5xx messages are replaced by the generic reason phrase
/// and the source chain is never serialized.
pub fn set_production(enabled: bool) {
    PRODUCTION.store(enabled, Ordering::Relaxed);
}

pub fn is_production() -> bool {
    PRODUCTION.load(Ordering::Relaxed)
}

/// Interpret `APP_ENV` / `NODE_ENV` style values.
pub fn is_production_env(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}
