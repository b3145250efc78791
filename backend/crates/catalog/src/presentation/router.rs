//! Catalog Routers
//!
//! Like the auth routers, these come without guards; the application
//! decides which ones sit behind `require_auth` and a role check.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::presentation::handlers::{self, CatalogAppState};

/// Multipart framing allowance on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Storefront: `GET /`, `GET /categories`, `GET /{id}`
pub fn products_public_router<R>(state: CatalogAppState<R>) -> Router
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::list_products::<R>))
        .route("/categories", get(handlers::list_storefront_categories::<R>))
        .route("/{id}", get(handlers::get_product::<R>))
        .with_state(state)
}

/// Product mutations (admin-or-owner)
pub fn products_staff_router<R>(state: CatalogAppState<R>) -> Router
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(handlers::create_product::<R>))
        .route(
            "/{id}",
            put(handlers::update_product::<R>).delete(handlers::delete_product::<R>),
        )
        .with_state(state)
}

/// Category management under `/api/admin` (admin-or-owner)
pub fn categories_admin_router<R>(state: CatalogAppState<R>) -> Router
where
    R: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories::<R>).post(handlers::create_category::<R>),
        )
        .route(
            "/categories/{id}",
            put(handlers::update_category::<R>).delete(handlers::delete_category::<R>),
        )
        .with_state(state)
}

/// `POST /image` (admin-or-owner)
pub fn upload_router<R>(state: CatalogAppState<R>) -> Router
where
    R: Send + Sync + 'static,
{
    let limit = state.config.max_image_bytes + MULTIPART_OVERHEAD;
    Router::new()
        .route("/image", post(handlers::upload_image::<R>))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use audit::{AuditRecorder, MemoryAuditRepository};
    use axum::Extension;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::application::config::CatalogConfig;
    use crate::infra::memory::MemoryCatalogRepository;
    use crate::test_support::staff;

    fn state(config: CatalogConfig) -> CatalogAppState<MemoryCatalogRepository> {
        CatalogAppState::new(
            Arc::new(MemoryCatalogRepository::new()),
            Arc::new(config),
            AuditRecorder::new(Arc::new(MemoryAuditRepository::new())),
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Products router as mounted at `/api/products`, with the staff
    /// extension standing in for the session guard
    fn products_app(state: CatalogAppState<MemoryCatalogRepository>) -> Router {
        products_public_router(state.clone())
            .merge(products_staff_router(state).layer(Extension(staff())))
    }

    fn multipart(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_category_and_product_lifecycle() {
        let state = state(CatalogConfig::default());
        let admin = categories_admin_router(state.clone()).layer(Extension(staff()));
        let products = products_app(state);

        let response = admin
            .clone()
            .oneshot(json_request(
                "POST",
                "/categories",
                serde_json::json!({"name": "  Cakes "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Category created");
        assert_eq!(json["category"]["name"], "Cakes");
        let category_id = json["category"]["_id"].as_str().unwrap().to_string();

        let response = admin
            .clone()
            .oneshot(json_request(
                "POST",
                "/categories",
                serde_json::json!({"name": "Cakes"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = products
            .clone()
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({
                    "title": "Sacher",
                    "image": "/uploads/sacher.png",
                    "description": "Chocolate cake",
                    "price": "12.50",
                    "preparationTime": 30,
                    "category": category_id,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Product created");
        assert_eq!(json["product"]["price"], 12.5);
        assert_eq!(json["product"]["category"]["name"], "Cakes");
        let product_id = json["product"]["_id"].as_str().unwrap().to_string();

        let response = products
            .clone()
            .oneshot(get(&format!("/?category={category_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["products"].as_array().unwrap().len(), 1);

        let response = products
            .clone()
            .oneshot(get(&format!("/{product_id}")))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["product"]["title"], "Sacher");

        // Category still referenced
        let response = admin
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/categories/{category_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Cannot delete category used by products"
        );

        let response = products
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{product_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["message"], "Product deleted");

        let response = admin
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/categories/{category_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Category deleted");
    }

    #[tokio::test]
    async fn test_bad_ids() {
        let products = products_app(state(CatalogConfig::default()));

        let response = products
            .clone()
            .oneshot(get("/?category=nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid category id");

        // Empty filter means no filter
        let response = products.clone().oneshot(get("/?category=")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = products.clone().oneshot(get("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid product id");

        let response = products
            .oneshot(get(&format!("/{}", kernel::id::ProductId::new())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_image() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(state(CatalogConfig::with_upload_dir(dir.path())));

        let response = app
            .clone()
            .oneshot(multipart("image", "my cake.png", "image/png", b"\x89PNG...."))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Image uploaded");
        let url = json["imageUrl"].as_str().unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-my_cake.png"));
        let stored = dir.path().join(url.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), b"\x89PNG....");

        let response = app
            .clone()
            .oneshot(multipart("image", "notes.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Only image files are allowed");

        let response = app
            .clone()
            .oneshot(multipart("avatar", "a.png", "image/png", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Image file is required");

        let response = app
            .oneshot(json_request("POST", "/image", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CatalogConfig::with_upload_dir(dir.path());
        config.max_image_bytes = 16;
        let app = upload_router(state(config));

        let response = app
            .oneshot(multipart("image", "big.png", "image/png", &[0u8; 64]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
