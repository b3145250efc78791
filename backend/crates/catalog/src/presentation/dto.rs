//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{NewProductInput, ProductPatch};
use crate::domain::category::Category;
use crate::domain::numeric::NumericInput;
use crate::domain::product::ProductView;

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryMessageResponse {
    pub message: &'static str,
    pub category: CategoryResponse,
}

// ============================================================================
// Products
// ============================================================================

/// Category as embedded in a product
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub description: String,
    pub preparation_time: Option<f64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: Option<CategoryRef>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        let ProductView { product, category } = view;
        Self {
            id: product.id,
            title: product.title,
            image: product.image,
            description: product.description,
            preparation_time: product.preparation_time,
            price: product.price,
            category: category.map(|c| CategoryRef {
                id: c.id,
                name: c.name.to_string(),
            }),
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumericInput>,
    pub preparation_time: Option<NumericInput>,
    pub category: Option<String>,
}

impl From<ProductRequest> for NewProductInput {
    fn from(req: ProductRequest) -> Self {
        Self {
            title: req.title,
            image: req.image,
            description: req.description,
            price: req.price,
            preparation_time: req.preparation_time,
            category: req.category,
        }
    }
}

/// Distinguishes an absent field from an explicit `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatchRequest {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumericInput>,
    #[serde(default, deserialize_with = "present")]
    pub preparation_time: Option<Option<NumericInput>>,
    pub category: Option<String>,
}

impl From<ProductPatchRequest> for ProductPatch {
    fn from(req: ProductPatchRequest) -> Self {
        Self {
            title: req.title,
            image: req.image,
            description: req.description,
            price: req.price,
            preparation_time: req.preparation_time,
            category: req.category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductEnvelope {
    pub product: ProductResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductMessageResponse {
    pub message: &'static str,
    pub product: ProductResponse,
}

// ============================================================================
// Misc
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,
    pub image_url: String,
}
