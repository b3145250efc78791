//! Product Use Cases

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use audit::{AuditRecorder, NewAuditEntry, TargetType, actions};
use auth::CurrentAccount;
use chrono::Utc;
use kernel::id::{CategoryId, ProductId};

use crate::domain::category::Category;
use crate::domain::numeric::NumericInput;
use crate::domain::product::{
    Product, ProductView, validate_description, validate_image, validate_title,
};
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Default)]
pub struct NewProductInput {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumericInput>,
    pub preparation_time: Option<NumericInput>,
    pub category: Option<String>,
}

/// Partial update. `preparation_time: Some(None)` clears the value.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumericInput>,
    pub preparation_time: Option<Option<NumericInput>>,
    pub category: Option<String>,
}

pub fn parse_category_id(raw: &str) -> CatalogResult<CategoryId> {
    CategoryId::parse(raw).ok_or(CatalogError::InvalidCategoryId)
}

pub fn parse_product_id(raw: &str) -> CatalogResult<ProductId> {
    ProductId::parse(raw).ok_or(CatalogError::InvalidProductId)
}

/// Attach categories with one lookup
pub(crate) async fn populate<R>(repo: &R, products: Vec<Product>) -> CatalogResult<Vec<ProductView>>
where
    R: CategoryRepository,
{
    let ids: Vec<CategoryId> = products
        .iter()
        .map(|p| p.category_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let categories: HashMap<_, _> = repo
        .find_categories(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(products
        .into_iter()
        .map(|product| ProductView {
            category: categories.get(&product.category_id).cloned(),
            product,
        })
        .collect())
}

// ============================================================================
// Public reads
// ============================================================================

pub struct BrowseProductsUseCase<R>
where
    R: CategoryRepository + ProductRepository,
{
    repo: Arc<R>,
}

impl<R> BrowseProductsUseCase<R>
where
    R: CategoryRepository + ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, category: Option<CategoryId>) -> CatalogResult<Vec<ProductView>> {
        let products = self.repo.list_products(category).await?;
        populate(self.repo.as_ref(), products).await
    }

    /// Storefront category list, alphabetical
    pub async fn categories(&self) -> CatalogResult<Vec<Category>> {
        self.repo.list_categories_by_name().await
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<ProductView> {
        let product = self
            .repo
            .find_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        let mut views = populate(self.repo.as_ref(), vec![product]).await?;
        views.pop().ok_or(CatalogError::ProductNotFound)
    }
}

// ============================================================================
// Staff mutations
// ============================================================================

pub struct ManageProductsUseCase<R>
where
    R: CategoryRepository + ProductRepository,
{
    repo: Arc<R>,
    audit: AuditRecorder,
}

impl<R> ManageProductsUseCase<R>
where
    R: CategoryRepository + ProductRepository,
{
    pub fn new(repo: Arc<R>, audit: AuditRecorder) -> Self {
        Self { repo, audit }
    }

    async fn existing_category(&self, raw: &str) -> CatalogResult<CategoryId> {
        let id = parse_category_id(raw)?;
        self.repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;
        Ok(id)
    }

    pub async fn create(
        &self,
        actor: &CurrentAccount,
        input: NewProductInput,
    ) -> CatalogResult<ProductView> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        if blank(&input.title)
            || blank(&input.image)
            || blank(&input.description)
            || blank(&input.category)
        {
            return Err(required());
        }
        let (Some(title), Some(image), Some(description), Some(price), Some(category)) = (
            input.title,
            input.image,
            input.description,
            input.price,
            input.category,
        ) else {
            return Err(required());
        };

        let category_id = self.existing_category(&category).await?;
        let price = price.to_price()?;
        let preparation_time = match input.preparation_time {
            Some(raw) => raw.to_preparation_time()?,
            None => None,
        };

        let product = Product {
            id: ProductId::new(),
            title: validate_title(&title)?,
            image: validate_image(&image)?,
            description: validate_description(&description)?,
            preparation_time,
            price,
            category_id,
            created_at: Utc::now(),
        };
        self.repo.create_product(&product).await?;

        tracing::info!(product_id = %product.id, title = %product.title, "Product created");
        self.record(actor, actions::CREATED_PRODUCT, &product, "created");

        let mut views = populate(self.repo.as_ref(), vec![product]).await?;
        views.pop().ok_or(CatalogError::ProductNotFound)
    }

    pub async fn update(
        &self,
        actor: &CurrentAccount,
        id: ProductId,
        patch: ProductPatch,
    ) -> CatalogResult<ProductView> {
        let category_id = match patch.category.as_deref() {
            Some(raw) => Some(self.existing_category(raw).await?),
            None => None,
        };

        let mut product = self
            .repo
            .find_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if let Some(title) = patch.title {
            product.title = validate_title(&title)?;
        }
        if let Some(image) = patch.image {
            product.image = validate_image(&image)?;
        }
        if let Some(description) = patch.description {
            product.description = validate_description(&description)?;
        }
        if let Some(price) = patch.price {
            product.price = price.to_price()?;
        }
        if let Some(preparation_time) = patch.preparation_time {
            product.preparation_time = match preparation_time {
                Some(raw) => raw.to_preparation_time()?,
                None => None,
            };
        }
        if let Some(category_id) = category_id {
            product.category_id = category_id;
        }

        self.repo.update_product(&product).await?;

        tracing::info!(product_id = %product.id, "Product updated");
        self.record(actor, actions::UPDATED_PRODUCT, &product, "updated");

        let mut views = populate(self.repo.as_ref(), vec![product]).await?;
        views.pop().ok_or(CatalogError::ProductNotFound)
    }

    pub async fn delete(&self, actor: &CurrentAccount, id: ProductId) -> CatalogResult<()> {
        let product = self
            .repo
            .find_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        if !self.repo.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        tracing::info!(product_id = %product.id, "Product deleted");
        self.record(actor, actions::DELETED_PRODUCT, &product, "deleted");
        Ok(())
    }

    fn record(&self, actor: &CurrentAccount, action: &str, product: &Product, verb: &str) {
        self.audit.record(
            NewAuditEntry::new(actor.id, action, TargetType::Product)
                .target(product.id.into_uuid(), product.title.as_str())
                .details(format!("{} {verb} product {}", actor.username, product.title)),
        );
    }
}

fn required() -> CatalogError {
    CatalogError::Validation(
        "title, image, description, price and category are required".to_string(),
    )
}
