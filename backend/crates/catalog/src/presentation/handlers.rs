//! HTTP Handlers

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use audit::AuditRecorder;
use auth::CurrentAccount;
use kernel::extract::JsonBody;
use std::sync::Arc;

use crate::application::config::CatalogConfig;
use crate::application::{
    BrowseProductsUseCase, ManageCategoriesUseCase, ManageProductsUseCase, StoreImageUseCase,
    parse_category_id, parse_product_id,
};
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{
    CategoryListResponse, CategoryMessageResponse, CategoryRequest, MessageResponse,
    ProductEnvelope, ProductListQuery, ProductListResponse, ProductMessageResponse,
    ProductPatchRequest, ProductRequest, UploadResponse,
};

/// Shared state for catalog handlers
pub struct CatalogAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<CatalogConfig>,
    pub audit: AuditRecorder,
}

impl<R> Clone for CatalogAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<R> CatalogAppState<R> {
    pub fn new(repo: Arc<R>, config: Arc<CatalogConfig>, audit: AuditRecorder) -> Self {
        Self {
            repo,
            config,
            audit,
        }
    }
}

// ============================================================================
// Storefront
// ============================================================================

/// GET /api/products
pub async fn list_products<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<ProductListQuery>,
) -> CatalogResult<Json<ProductListResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let category = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(raw) => Some(parse_category_id(raw)?),
        None => None,
    };

    let products = BrowseProductsUseCase::new(state.repo.clone())
        .list(category)
        .await?;

    Ok(Json(ProductListResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/products/categories
pub async fn list_storefront_categories<R>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<CategoryListResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let categories = BrowseProductsUseCase::new(state.repo.clone())
        .categories()
        .await?;

    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/products/{id}
pub async fn get_product<R>(
    State(state): State<CatalogAppState<R>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ProductEnvelope>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let id = parse_product_id(&id)?;
    let product = BrowseProductsUseCase::new(state.repo.clone()).get(id).await?;

    Ok(Json(ProductEnvelope {
        product: product.into(),
    }))
}

// ============================================================================
// Staff: products
// ============================================================================

fn manage_products<R>(state: &CatalogAppState<R>) -> ManageProductsUseCase<R>
where
    R: CategoryRepository + ProductRepository,
{
    ManageProductsUseCase::new(state.repo.clone(), state.audit.clone())
}

/// POST /api/products
pub async fn create_product<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> CatalogResult<impl IntoResponse>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let product = manage_products(&state).create(&actor, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMessageResponse {
            message: "Product created",
            product: product.into(),
        }),
    ))
}

/// PUT /api/products/{id}
pub async fn update_product<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ProductPatchRequest>,
) -> CatalogResult<Json<ProductMessageResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let id = parse_product_id(&id)?;
    let product = manage_products(&state).update(&actor, id, req.into()).await?;

    Ok(Json(ProductMessageResponse {
        message: "Product updated",
        product: product.into(),
    }))
}

/// DELETE /api/products/{id}
pub async fn delete_product<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let id = parse_product_id(&id)?;
    manage_products(&state).delete(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted",
    }))
}

// ============================================================================
// Staff: categories
// ============================================================================

fn manage_categories<R>(state: &CatalogAppState<R>) -> ManageCategoriesUseCase<R>
where
    R: CategoryRepository,
{
    ManageCategoriesUseCase::new(state.repo.clone(), state.audit.clone())
}

/// GET /api/admin/categories
pub async fn list_categories<R>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<CategoryListResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let categories = manage_categories(&state).list().await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/admin/categories
pub async fn create_category<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> CatalogResult<impl IntoResponse>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let category = manage_categories(&state)
        .create(&actor, req.name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryMessageResponse {
            message: "Category created",
            category: category.into(),
        }),
    ))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> CatalogResult<Json<CategoryMessageResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let id = parse_category_id(&id)?;
    let category = manage_categories(&state)
        .rename(&actor, id, req.name.as_deref())
        .await?;

    Ok(Json(CategoryMessageResponse {
        message: "Category updated",
        category: category.into(),
    }))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category<R>(
    State(state): State<CatalogAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>>
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let id = parse_category_id(&id)?;
    manage_categories(&state).delete(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Category deleted",
    }))
}

// ============================================================================
// Uploads
// ============================================================================

fn multipart_error(err: axum::extract::multipart::MultipartError) -> CatalogError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CatalogError::ImageTooLarge
    } else {
        CatalogError::Validation(err.body_text())
    }
}

/// Stream one field into memory, stopping as soon as it exceeds `limit`
async fn read_limited(mut field: Field<'_>, limit: usize) -> CatalogResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(CatalogError::ImageTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// POST /api/uploads/image
pub async fn upload_image<R>(
    State(state): State<CatalogAppState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> CatalogResult<impl IntoResponse>
where
    R: Send + Sync + 'static,
{
    let mut multipart = multipart.map_err(|_| CatalogError::ImageRequired)?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        StoreImageUseCase::check_type(content_type.as_deref())?;

        let bytes = read_limited(field, state.config.max_image_bytes).await?;
        let stored = StoreImageUseCase::new(state.config.clone())
            .execute(file_name.as_deref(), content_type.as_deref(), &bytes)
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "Image uploaded",
                image_url: stored.url,
            }),
        ));
    }

    Err(CatalogError::ImageRequired)
}
