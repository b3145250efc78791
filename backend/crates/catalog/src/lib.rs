//! Catalog Backend Module
//!
//! Categories, products and product images.
//!
//! - `domain/` - Category and product entities, numeric input parsing,
//!   repository traits
//! - `application/` - Storefront browsing, staff management, image storage
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! A category referenced by any product cannot be deleted; the stores
//! enforce this atomically with the delete.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::CatalogConfig;
pub use domain::{Category, Product, ProductView};
pub use domain::repository::{CategoryRepository, ProductRepository};
pub use error::{CatalogError, CatalogResult};
pub use infra::{MemoryCatalogRepository, PgCatalogRepository};
pub use presentation::{
    CatalogAppState, categories_admin_router, products_public_router, products_staff_router,
    upload_router,
};
