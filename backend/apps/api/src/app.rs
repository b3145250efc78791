//! Router Composition
//!
//! Each domain crate hands out unguarded routers; access policies are
//! layered here. `route_layer` runs outer-first, so `require_auth` is added
//! last to make it run before the role checks.

use std::sync::Arc;

use audit::{AuditRecorder, AuditRepository, audit_router};
use auth::{
    AccountDirectory, AccountRepository, AuthAppState, admin_owner_router, admin_staff_router,
    auth_router, require_admin_or_owner, require_auth, require_owner,
};
use axum::http::{HeaderValue, Method, Uri, header};
use axum::{Json, Router, middleware, routing::get};
use catalog::{
    CatalogAppState, CategoryRepository, ProductRepository, categories_admin_router,
    products_public_router, products_staff_router, upload_router,
};
use kernel::error::app_error::AppError;
use orders::{OrderRepository, OrdersAppState, PaymentGateway, orders_router, orders_staff_router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::dashboard::{DashboardState, dashboard_router};

/// Persistence behind the application, one store per concern
pub struct Stores<A, C, O, L> {
    pub accounts: Arc<A>,
    pub catalog: Arc<C>,
    pub orders: Arc<O>,
    pub audit: Arc<L>,
}

impl<A, C, O, L> Clone for Stores<A, C, O, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            catalog: self.catalog.clone(),
            orders: self.orders.clone(),
            audit: self.audit.clone(),
        }
    }
}

pub fn build_router<A, C, O, L, G>(
    stores: Stores<A, C, O, L>,
    gateway: Arc<G>,
    config: &AppConfig,
) -> Router
where
    A: AccountRepository + Send + Sync + 'static,
    C: CategoryRepository + ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    L: AuditRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let audit = AuditRecorder::new(stores.audit.clone());

    let auth_state = AuthAppState::new(
        stores.accounts.clone(),
        Arc::new(config.auth.clone()),
        audit.clone(),
    );
    let catalog_state = CatalogAppState::new(
        stores.catalog.clone(),
        Arc::new(config.catalog.clone()),
        audit.clone(),
    );
    let orders_state = OrdersAppState::new(
        stores.orders.clone(),
        stores.catalog.clone(),
        stores.accounts.clone(),
        gateway,
        Arc::new(config.orders.clone()),
        audit,
    );
    let guard = auth_state.guard();
    let authenticated = middleware::from_fn_with_state(guard, require_auth::<A>);

    let admin = dashboard_router(DashboardState {
        accounts: stores.accounts.clone(),
        catalog: stores.catalog.clone(),
    })
    .merge(admin_staff_router(auth_state.clone()))
    .merge(categories_admin_router(catalog_state.clone()))
    .route_layer(middleware::from_fn(require_admin_or_owner))
    .merge(
        admin_owner_router(auth_state.clone())
            .merge(audit_router(
                stores.audit,
                Arc::new(AccountDirectory::new(stores.accounts)),
            ))
            .route_layer(middleware::from_fn(require_owner)),
    )
    .route_layer(authenticated.clone());

    let products = products_public_router(catalog_state.clone()).merge(
        products_staff_router(catalog_state.clone())
            .route_layer(middleware::from_fn(require_admin_or_owner))
            .route_layer(authenticated.clone()),
    );

    let orders = orders_router(orders_state.clone())
        .merge(
            orders_staff_router(orders_state)
                .route_layer(middleware::from_fn(require_admin_or_owner)),
        )
        .route_layer(authenticated.clone());

    let uploads = upload_router(catalog_state)
        .route_layer(middleware::from_fn(require_admin_or_owner))
        .route_layer(authenticated);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/admin", admin)
        .nest("/api/products", products)
        .nest("/api/orders", orders)
        .nest("/api/uploads", uploads)
        .nest_service("/uploads", ServeDir::new(&config.catalog.upload_dir))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins))
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::AUTHORIZATION]))
        .allow_credentials(true)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route not found: {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use audit::MemoryAuditRepository;
    use auth::{BootstrapOwnerUseCase, MemoryAccountRepository, NewAccountInput};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use catalog::MemoryCatalogRepository;
    use orders::{FakePaymentGateway, MemoryOrderRepository};
    use tower::ServiceExt;

    type MemoryStores = Stores<
        MemoryAccountRepository,
        MemoryCatalogRepository,
        MemoryOrderRepository,
        MemoryAuditRepository,
    >;

    struct TestApp {
        router: Router,
        stores: MemoryStores,
        config: AppConfig,
        _uploads: tempfile::TempDir,
    }

    fn app() -> TestApp {
        let uploads = tempfile::tempdir().unwrap();
        let env: HashMap<&str, String> = HashMap::from([
            ("JWT_SECRET", "test-secret-for-router".to_string()),
            ("UPLOAD_DIR", uploads.path().display().to_string()),
            ("FRONTEND_ORIGINS", "https://shop.test".to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

        let stores = Stores {
            accounts: Arc::new(MemoryAccountRepository::new()),
            catalog: Arc::new(MemoryCatalogRepository::new()),
            orders: Arc::new(MemoryOrderRepository::new()),
            audit: Arc::new(MemoryAuditRepository::new()),
        };
        let router = build_router(stores.clone(), Arc::new(FakePaymentGateway::new()), &config);

        TestApp {
            router,
            stores,
            config,
            _uploads: uploads,
        }
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn login_owner(app: &TestApp) -> String {
        BootstrapOwnerUseCase::new(app.stores.accounts.clone(), Arc::new(app.config.auth.clone()))
            .execute(NewAccountInput {
                username: Some("boss".into()),
                email: Some("boss@bakery.test".into()),
                password: Some("owner-password".into()),
            })
            .await
            .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({
                    "usernameOrEmail": "boss",
                    "password": "owner-password",
                    "accountType": "admin",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie(&response)
    }

    async fn register(app: &TestApp, name: &str) -> String {
        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "username": name,
                    "email": format!("{name}@x.com"),
                    "password": "password1",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        session_cookie(&response)
    }

    #[tokio::test]
    async fn test_health_and_fallback() {
        let app = app();

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        let response = app
            .router
            .oneshot(request("GET", "/api/nope", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Route not found: /api/nope");
    }

    #[tokio::test]
    async fn test_admin_routes_are_guarded() {
        let app = app();
        let customer = register(&app, "alice").await;

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/admin/stats", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/admin/stats", Some(&customer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .router
            .clone()
            .oneshot(request("POST", "/api/products", Some(&customer), Some(serde_json::json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let owner = login_owner(&app).await;
        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/admin/stats", Some(&owner), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats = &body_json(response).await["stats"];
        assert_eq!(stats["users"], 1);
        assert_eq!(stats["owners"], 1);
        assert_eq!(stats["admins"], 0);
        assert_eq!(stats["products"], 0);

        let response = app
            .router
            .oneshot(request("GET", "/api/admin/logs", Some(&owner), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_shop_flow() {
        let app = app();
        let owner = login_owner(&app).await;

        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/admin/categories",
                Some(&owner),
                Some(serde_json::json!({"name": "Bread"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let category_id = body_json(response).await["category"]["_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/products",
                Some(&owner),
                Some(serde_json::json!({
                    "title": "Focaccia",
                    "image": "/uploads/focaccia.png",
                    "description": "Genovese",
                    "price": 4.2,
                    "category": category_id,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let product_id = body_json(response).await["product"]["_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/products", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["products"].as_array().unwrap().len(), 1);

        let customer = register(&app, "alice").await;
        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/api/orders/checkout-session",
                Some(&customer),
                Some(serde_json::json!({"items": [{"productId": product_id, "quantity": 2}]})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/api/orders/staff", Some(&customer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .router
            .oneshot(request("GET", "/api/orders/staff", Some(&owner), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let orders = body_json(response).await;
        assert_eq!(orders["orders"].as_array().unwrap().len(), 1);
        assert_eq!(orders["orders"][0]["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = app();
        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/products")
                    .header(header::ORIGIN, "https://shop.test")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://shop.test"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
