//! Application Layer

pub mod cancel;
pub mod checkout;
pub mod config;
pub mod listing;
pub mod staff_update;

pub use cancel::{CancelOutcome, CancelPendingOrderUseCase, SweepPendingOrdersUseCase};
pub use checkout::{CartItem, CheckoutOutput, CheckoutUseCase};
pub use config::OrdersConfig;
pub use listing::{ListOrdersUseCase, OrderView};
pub use staff_update::UpdateOrderUseCase;
