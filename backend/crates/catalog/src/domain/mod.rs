//! Domain Layer

pub mod category;
pub mod numeric;
pub mod product;
pub mod repository;

pub use category::{Category, CategoryName};
pub use numeric::NumericInput;
pub use product::{Product, ProductView};
pub use repository::{CategoryRepository, ProductRepository};
