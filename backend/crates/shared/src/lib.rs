//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the shop's vocabulary:
//! - Common error types and result aliases
//! - Typed entity identifiers
//! - Error exposure policy (production masking)
//! - A JSON body extractor that rejects with the shared error shape
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod exposure;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
