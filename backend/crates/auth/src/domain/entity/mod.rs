//! Entities

pub mod account;

pub use account::{Account, CurrentAccount, RoleCounts};
