//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::OrdersAppState;
pub use router::{orders_router, orders_staff_router};
