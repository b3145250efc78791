//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{Account, CurrentAccount, RoleCounts};
pub use repository::AccountRepository;
pub use value_object::{access_policy::AccessPolicy, account_role::AccountRole};
