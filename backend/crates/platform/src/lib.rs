//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id)
//! - Session cookie building and parsing
//! - Client/transport detection from request headers

pub mod client;
pub mod cookie;
pub mod password;
