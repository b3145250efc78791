//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::CatalogAppState;
pub use router::{
    categories_admin_router, products_public_router, products_staff_router, upload_router,
};
