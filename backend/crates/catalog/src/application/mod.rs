//! Application Layer

pub mod categories;
pub mod config;
pub mod products;
pub mod upload;

pub use categories::ManageCategoriesUseCase;
pub use config::CatalogConfig;
pub use products::{
    BrowseProductsUseCase, ManageProductsUseCase, NewProductInput, ProductPatch,
    parse_category_id, parse_product_id,
};
pub use upload::{StoreImageUseCase, StoredImage};
