//! Orders Backend Module
//!
//! Cart checkout, customer order history and cancellation, staff status
//! updates.
//!
//! - `domain/` - Order entity with price snapshots, status workflow,
//!   repository and payment gateway ports
//! - `application/` - Checkout, listing, staff update, cancellation, sweep
//! - `infra/` - PostgreSQL and in-memory stores, Stripe adapter, recording fake
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Checkout
//! The order is stored as pending before the provider is called. If the
//! provider call fails the order is deleted again and the caller gets 502.
//! Orders abandoned at the provider stay pending until the customer cancels
//! them or the startup sweep removes them.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::{OrdersConfig, SweepPendingOrdersUseCase};
pub use domain::{Order, OrderRepository, OrderStatus, PaymentGateway};
pub use error::{OrderError, OrderResult};
pub use infra::{FakePaymentGateway, MemoryOrderRepository, PgOrderRepository, StripeGateway};
pub use presentation::{OrdersAppState, orders_router, orders_staff_router};

#[cfg(test)]
pub(crate) mod test_support {
    use auth::{AccountRole, CurrentAccount};
    use chrono::Utc;
    use kernel::id::AccountId;

    fn account(username: &str, role: AccountRole) -> CurrentAccount {
        CurrentAccount {
            id: AccountId::new(),
            username: username.to_string(),
            email: format!("{username}@x.com"),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn customer() -> CurrentAccount {
        account("alice", AccountRole::User)
    }

    pub fn staff() -> CurrentAccount {
        account("mia", AccountRole::Admin)
    }
}
