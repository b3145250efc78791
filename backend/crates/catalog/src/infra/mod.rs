//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogRepository;
pub use postgres::PgCatalogRepository;
