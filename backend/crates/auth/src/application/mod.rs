//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod bootstrap_owner;
pub mod config;
pub mod directory;
pub mod login;
pub mod manage_admins;
pub mod profile;
pub mod register;
pub mod token;

// Re-exports
pub use authenticate::{AuthenticateUseCase, Authenticated};
pub use bootstrap_owner::BootstrapOwnerUseCase;
pub use config::AuthConfig;
pub use directory::AccountDirectory;
pub use login::{AccountType, LoginInput, LoginOutput, LoginUseCase};
pub use manage_admins::ManageAdminsUseCase;
pub use profile::{AccountChanges, UpdateProfileUseCase};
pub use register::{NewAccountInput, RegisterOutput, RegisterUseCase};
pub use token::{IssuedToken, TokenService};
