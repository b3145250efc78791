//! Order Routers
//!
//! Both routers expect `require_auth` around them; the staff one also
//! expects the admin-or-owner check.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use auth::AccountRepository;
use catalog::ProductRepository;

use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::OrderRepository;
use crate::presentation::handlers::{self, OrdersAppState};

/// Customer routes: checkout, own orders, cancellation
pub fn orders_router<O, C, A, G>(state: OrdersAppState<O, C, A, G>) -> Router
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/checkout-session",
            post(handlers::create_checkout_session::<O, C, A, G>),
        )
        .route("/my-orders", get(handlers::my_orders::<O, C, A, G>))
        .route(
            "/cancel-pending/{id}",
            delete(handlers::cancel_pending::<O, C, A, G>),
        )
        .with_state(state)
}

/// Staff routes: `GET /staff`, `PUT /staff/{id}`
pub fn orders_staff_router<O, C, A, G>(state: OrdersAppState<O, C, A, G>) -> Router
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/staff", get(handlers::list_all_orders::<O, C, A, G>))
        .route("/staff/{id}", put(handlers::update_order::<O, C, A, G>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;

    use audit::{AuditRecorder, MemoryAuditRepository};
    use auth::MemoryAccountRepository;
    use axum::Extension;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use catalog::domain::CategoryName;
    use catalog::{Category, CategoryRepository, MemoryCatalogRepository, Product};
    use chrono::Utc;
    use kernel::id::ProductId;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use crate::application::config::OrdersConfig;
    use crate::infra::{FakePaymentGateway, MemoryOrderRepository};
    use crate::test_support::{customer, staff};

    type State = OrdersAppState<
        MemoryOrderRepository,
        MemoryCatalogRepository,
        MemoryAccountRepository,
        FakePaymentGateway,
    >;

    async fn state_with_product() -> (State, Product) {
        let catalog = Arc::new(MemoryCatalogRepository::new());
        let category = Category::new(CategoryName::new(Some("Bread")).unwrap());
        catalog.create_category(&category).await.unwrap();
        let product = Product {
            id: ProductId::new(),
            title: "Focaccia".into(),
            image: "/uploads/focaccia.png".into(),
            description: "Olive oil".into(),
            preparation_time: Some(10.0),
            price: Decimal::from_str("4.20").unwrap(),
            category_id: category.id,
            created_at: Utc::now(),
        };
        catalog.create_product(&product).await.unwrap();

        let state = OrdersAppState::new(
            Arc::new(MemoryOrderRepository::new()),
            catalog,
            Arc::new(MemoryAccountRepository::new()),
            Arc::new(FakePaymentGateway::new()),
            Arc::new(OrdersConfig::default()),
            AuditRecorder::new(Arc::new(MemoryAuditRepository::new())),
        );
        (state, product)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_list_cancel() {
        let (state, product) = state_with_product().await;
        let buyer = customer();
        let app = orders_router(state).layer(Extension(buyer.clone()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/checkout-session",
                serde_json::json!({"items": [{"productId": product.id.to_string(), "quantity": 3}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let order_id = json["orderId"].as_str().unwrap().to_string();
        assert!(json["sessionId"].as_str().unwrap().starts_with("cs_test_"));
        assert!(json["checkoutUrl"].as_str().unwrap().starts_with("https://"));

        let response = app.clone().oneshot(empty("GET", "/my-orders")).await.unwrap();
        let json = body_json(response).await;
        let order = &json["orders"][0];
        assert_eq!(order["_id"], order_id.as_str());
        assert_eq!(order["user"], buyer.id.to_string());
        assert_eq!(order["status"], "In attesa");
        assert!((order["totalAmount"].as_f64().unwrap() - 12.6).abs() < 1e-9);
        assert_eq!(order["products"][0]["product"]["title"], "Focaccia");
        assert!(order["products"][0]["product"].get("price").is_none());
        assert!((order["products"][0]["unitPrice"].as_f64().unwrap() - 4.2).abs() < 1e-9);

        let response = app
            .clone()
            .oneshot(empty("DELETE", &format!("/cancel-pending/{order_id}")))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["message"], "Pending order canceled");

        let response = app.oneshot(empty("GET", "/my-orders")).await.unwrap();
        assert!(body_json(response).await["orders"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_cart_is_rejected() {
        let (state, product) = state_with_product().await;
        let orders = state.orders.clone();
        let app = orders_router(state).layer(Extension(customer()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/checkout-session",
                serde_json::json!({"items": [
                    {"productId": product.id.to_string(), "quantity": 1},
                    {"productId": product.id.to_string(), "quantity": 0},
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid cart items");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/checkout-session", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Cart items are required");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/checkout-session",
                serde_json::json!({"items": [
                    {"productId": product.id.to_string(), "quantity": 3_000_000_000_i64},
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid cart items");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/checkout-session")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"items\": ["))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["title"], "Bad Request");

        assert!(orders.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_staff_update() {
        let (state, product) = state_with_product().await;
        let customer_app = orders_router(state.clone()).layer(Extension(customer()));
        let staff_app = orders_staff_router(state).layer(Extension(staff()));

        let response = customer_app
            .clone()
            .oneshot(json_request(
                "POST",
                "/checkout-session",
                serde_json::json!({"items": [{"productId": product.id.to_string(), "quantity": 1}]}),
            ))
            .await
            .unwrap();
        let order_id = body_json(response).await["orderId"]
            .as_str()
            .unwrap()
            .to_string();

        let response = staff_app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/staff/{order_id}"),
                serde_json::json!({"status": "Soon"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid status");

        let response = staff_app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/staff/{order_id}"),
                serde_json::json!({"status": "In preparazione", "remainingTime": " 10 min "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Order updated");
        assert_eq!(json["order"]["status"], "In preparazione");
        assert_eq!(json["order"]["remainingTime"], "10 min");
        assert!(json["order"]["products"][0]["product"]["price"].is_number());

        // Customer can no longer cancel, and the order survives
        let response = customer_app
            .oneshot(empty("DELETE", &format!("/cancel-pending/{order_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Order already in progress and cannot be canceled"
        );

        let response = staff_app.clone().oneshot(empty("GET", "/staff")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["orders"].as_array().unwrap().len(), 1);
        // Buyer account is not in the account store here
        assert!(json["orders"][0]["user"].is_null());

        let response = staff_app
            .oneshot(json_request(
                "PUT",
                "/staff/not-an-id",
                serde_json::json!({"status": "Completato"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid order id");
    }
}
