//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session_cookie;

pub use handlers::AuthAppState;
pub use middleware::{AuthGuard, require_admin_or_owner, require_auth, require_owner};
pub use router::{admin_owner_router, admin_staff_router, auth_router};
