//! In-memory catalog store (development and tests)

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{CategoryId, ProductId};
use tokio::sync::RwLock;

use crate::domain::category::{Category, CategoryName};
use crate::domain::product::Product;
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

#[derive(Default)]
struct Tables {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
}

/// Both tables behind one lock so the in-use check and the delete are atomic
#[derive(Clone, Default)]
pub struct MemoryCatalogRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CategoryRepository for MemoryCatalogRepository {
    async fn create_category(&self, category: &Category) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == category.name) {
            return Err(CatalogError::CategoryExists);
        }
        tables.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }

    async fn category_name_taken(
        &self,
        name: &CategoryName,
        except: Option<CategoryId>,
    ) -> CatalogResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .categories
            .values()
            .any(|c| Some(c.id) != except && &c.name == name))
    }

    async fn list_categories_newest(&self) -> CatalogResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(categories)
    }

    async fn list_categories_by_name(&self) -> CatalogResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(categories)
    }

    async fn update_category(&self, category: &Category) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(CatalogError::CategoryExists);
        }
        match tables.categories.get_mut(&category.id) {
            Some(existing) => {
                *existing = category.clone();
                Ok(())
            }
            None => Err(CatalogError::CategoryNotFound),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.category_id == id) {
            return Err(CatalogError::CategoryInUse);
        }
        Ok(tables.categories.remove(&id).is_some())
    }

    async fn count_categories(&self) -> CatalogResult<i64> {
        Ok(self.tables.read().await.categories.len() as i64)
    }
}

impl ProductRepository for MemoryCatalogRepository {
    async fn create_product(&self, product: &Product) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&product.category_id) {
            return Err(CatalogError::CategoryNotFound);
        }
        tables.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }

    async fn list_products(&self, category: Option<CategoryId>) -> CatalogResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .tables
            .read()
            .await
            .products
            .values()
            .filter(|p| category.is_none_or(|c| p.category_id == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn update_product(&self, product: &Product) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&product.category_id) {
            return Err(CatalogError::CategoryNotFound);
        }
        match tables.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(CatalogError::ProductNotFound),
        }
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn count_products(&self) -> CatalogResult<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }
}
