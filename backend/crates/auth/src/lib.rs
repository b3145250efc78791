//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Account entity, role hierarchy, repository trait
//! - `application/` - Use cases and the session token service
//! - `infra/` - PostgreSQL and in-memory account stores
//! - `presentation/` - HTTP handlers, DTOs, routers, guards
//!
//! ## Features
//! - Register / login (username or email) / logout / profile update
//! - Staff management (owner-only mutations, audited)
//! - Owner bootstrap at startup
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Stateless HS256 session tokens in an HTTP-only cookie, renewed when
//!   close to expiry
//! - Roles are re-read from the store on every request; the role claim in
//!   the token is informational only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, parse_token_ttl};
pub use application::{AccountDirectory, BootstrapOwnerUseCase, NewAccountInput};
pub use domain::entity::{Account, CurrentAccount, RoleCounts};
pub use domain::repository::AccountRepository;
pub use domain::value_object::account_role::AccountRole;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryAccountRepository, postgres::PgAccountRepository};
pub use presentation::{
    AuthAppState, AuthGuard, admin_owner_router, admin_staff_router, auth_router,
    require_admin_or_owner, require_auth, require_owner,
};
