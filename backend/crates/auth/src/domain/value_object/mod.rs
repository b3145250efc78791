//! Value Object Module

pub mod access_policy;
pub mod account_password;
pub mod account_role;
pub mod email;
pub mod username;
