//! Domain Layer

pub mod gateway;
pub mod order;
pub mod repository;
pub mod status;

pub use gateway::{CheckoutSession, CheckoutSessionRequest, LineItem, PaymentGateway};
pub use order::{Order, OrderLine, StaffUpdate};
pub use repository::OrderRepository;
pub use status::OrderStatus;
