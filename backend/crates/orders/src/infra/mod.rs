//! Infrastructure Layer

pub mod fake_gateway;
pub mod memory;
pub mod postgres;
pub mod stripe;

pub use fake_gateway::FakePaymentGateway;
pub use memory::MemoryOrderRepository;
pub use postgres::PgOrderRepository;
pub use stripe::StripeGateway;
