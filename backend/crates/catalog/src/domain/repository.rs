//! Repository Traits

use kernel::id::{CategoryId, ProductId};

use crate::domain::category::{Category, CategoryName};
use crate::domain::product::Product;
use crate::error::CatalogResult;

/// Category store. `create`/`update` reject a duplicate name with
/// [`CatalogError::CategoryExists`](crate::error::CatalogError::CategoryExists).
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    async fn create_category(&self, category: &Category) -> CatalogResult<()>;

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    async fn find_categories(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>>;

    /// Is the name used by a category other than `except`?
    async fn category_name_taken(
        &self,
        name: &CategoryName,
        except: Option<CategoryId>,
    ) -> CatalogResult<bool>;

    /// Newest first
    async fn list_categories_newest(&self) -> CatalogResult<Vec<Category>>;

    /// Alphabetical
    async fn list_categories_by_name(&self) -> CatalogResult<Vec<Category>>;

    async fn update_category(&self, category: &Category) -> CatalogResult<()>;

    /// Fails with [`CatalogError::CategoryInUse`](crate::error::CatalogError::CategoryInUse)
    /// while products reference it; false when nothing was deleted
    async fn delete_category(&self, id: CategoryId) -> CatalogResult<bool>;

    async fn count_categories(&self) -> CatalogResult<i64>;
}

#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create_product(&self, product: &Product) -> CatalogResult<()>;

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Unknown ids are skipped
    async fn find_products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>>;

    /// Newest first, optionally restricted to one category
    async fn list_products(&self, category: Option<CategoryId>) -> CatalogResult<Vec<Product>>;

    async fn update_product(&self, product: &Product) -> CatalogResult<()>;

    /// Returns false when nothing was deleted
    async fn delete_product(&self, id: ProductId) -> CatalogResult<bool>;

    async fn count_products(&self) -> CatalogResult<i64>;
}
