//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuditRepository;
pub use postgres::PgAuditRepository;
