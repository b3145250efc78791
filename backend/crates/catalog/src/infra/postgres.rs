//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{CategoryId, ProductId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::category::{Category, CategoryName};
use crate::domain::product::Product;
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository (categories and products)
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503"))
}

// ============================================================================
// Categories
// ============================================================================

impl CategoryRepository for PgCatalogRepository {
    async fn create_category(&self, category: &Category) -> CatalogResult<()> {
        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(category.id.as_uuid())
            .bind(category.name.as_str())
            .bind(category.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::CategoryExists
                } else {
                    CatalogError::Database(e)
                }
            })?;
        Ok(())
    }

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at FROM categories WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at FROM categories WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn category_name_taken(
        &self,
        name: &CategoryName,
        except: Option<CategoryId>,
    ) -> CatalogResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name.as_str())
        .bind(except.map(CategoryId::into_uuid))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn list_categories_newest(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at FROM categories ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn list_categories_by_name(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn update_category(&self, category: &Category) -> CatalogResult<()> {
        let result = sqlx::query("UPDATE categories SET name = $2 WHERE id = $1")
            .bind(category.id.as_uuid())
            .bind(category.name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::CategoryExists
                } else {
                    CatalogError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CategoryNotFound);
        }
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<bool> {
        // products.category_id is ON DELETE RESTRICT
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    CatalogError::CategoryInUse
                } else {
                    CatalogError::Database(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_categories(&self) -> CatalogResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Products
// ============================================================================

const PRODUCT_COLUMNS: &str =
    "id, title, image, description, preparation_time, price, category_id, created_at";

fn map_product_write(err: sqlx::Error) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::CategoryNotFound
    } else {
        CatalogError::Database(err)
    }
}

impl ProductRepository for PgCatalogRepository {
    async fn create_product(&self, product: &Product) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id,
                title,
                image,
                description,
                preparation_time,
                price,
                category_id,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.title)
        .bind(&product.image)
        .bind(&product.description)
        .bind(product.preparation_time)
        .bind(product.price)
        .bind(product.category_id.as_uuid())
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_product_write)?;

        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn find_products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn list_products(&self, category: Option<CategoryId>) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE ($1::uuid IS NULL OR category_id = $1) ORDER BY created_at DESC"
        ))
        .bind(category.map(CategoryId::into_uuid))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn update_product(&self, product: &Product) -> CatalogResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                title = $2,
                image = $3,
                description = $4,
                preparation_time = $5,
                price = $6,
                category_id = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.title)
        .bind(&product.image)
        .bind(&product.description)
        .bind(product.preparation_time)
        .bind(product.price)
        .bind(product.category_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_product_write)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound);
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_products(&self) -> CatalogResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId::from_uuid(self.id),
            name: CategoryName::from_db(self.name),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    image: String,
    description: String,
    preparation_time: Option<f64>,
    price: Decimal,
    category_id: Uuid,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            title: self.title,
            image: self.image,
            description: self.description,
            preparation_time: self.preparation_time,
            price: self.price,
            category_id: CategoryId::from_uuid(self.category_id),
            created_at: self.created_at,
        }
    }
}
