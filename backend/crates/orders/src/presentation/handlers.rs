//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use audit::AuditRecorder;
use auth::{AccountRepository, CurrentAccount};
use catalog::ProductRepository;
use kernel::extract::JsonBody;
use kernel::id::OrderId;
use platform::client::extract_origin;
use std::sync::Arc;

use crate::application::config::OrdersConfig;
use crate::application::{
    CancelPendingOrderUseCase, CheckoutUseCase, ListOrdersUseCase, UpdateOrderUseCase,
};
use crate::domain::gateway::PaymentGateway;
use crate::domain::order::StaffUpdate;
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};
use crate::presentation::dto::{
    CheckoutRequest, CheckoutResponse, MessageResponse, OrderListResponse, OrderResponse,
    OrderUpdatedResponse, StaffOrderUpdateRequest,
};

/// Shared state for order handlers
///
/// `O` orders, `C` catalog products, `A` accounts, `G` payment gateway.
pub struct OrdersAppState<O, C, A, G> {
    pub orders: Arc<O>,
    pub catalog: Arc<C>,
    pub accounts: Arc<A>,
    pub gateway: Arc<G>,
    pub config: Arc<OrdersConfig>,
    pub audit: AuditRecorder,
}

impl<O, C, A, G> Clone for OrdersAppState<O, C, A, G> {
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            catalog: self.catalog.clone(),
            accounts: self.accounts.clone(),
            gateway: self.gateway.clone(),
            config: self.config.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<O, C, A, G> OrdersAppState<O, C, A, G> {
    pub fn new(
        orders: Arc<O>,
        catalog: Arc<C>,
        accounts: Arc<A>,
        gateway: Arc<G>,
        config: Arc<OrdersConfig>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            orders,
            catalog,
            accounts,
            gateway,
            config,
            audit,
        }
    }
}

fn parse_order_id(raw: &str) -> OrderResult<OrderId> {
    OrderId::parse(raw).ok_or(OrderError::InvalidOrderId)
}

/// POST /api/orders/checkout-session
pub async fn create_checkout_session<O, C, A, G>(
    State(state): State<OrdersAppState<O, C, A, G>>,
    Extension(buyer): Extension<CurrentAccount>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<CheckoutRequest>,
) -> OrderResult<impl IntoResponse>
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let origin = extract_origin(&headers);
    let uc = CheckoutUseCase::new(
        state.orders.clone(),
        state.catalog.clone(),
        state.gateway.clone(),
        state.config.clone(),
    );

    // Configuration is reported before cart problems
    if !state.gateway.is_configured() {
        return Err(OrderError::PaymentNotConfigured);
    }
    let cart = req.into_cart()?;
    let out = uc.execute(&buyer, cart, origin.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(out))))
}

/// GET /api/orders/my-orders
pub async fn my_orders<O, C, A, G>(
    State(state): State<OrdersAppState<O, C, A, G>>,
    Extension(buyer): Extension<CurrentAccount>,
) -> OrderResult<Json<OrderListResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    let views = ListOrdersUseCase::new(
        state.orders.clone(),
        state.catalog.clone(),
        state.accounts.clone(),
    )
    .mine(buyer.id)
    .await?;

    Ok(Json(OrderListResponse {
        orders: views.into_iter().map(OrderResponse::for_customer).collect(),
    }))
}

/// DELETE /api/orders/cancel-pending/{id}
pub async fn cancel_pending<O, C, A, G>(
    State(state): State<OrdersAppState<O, C, A, G>>,
    Extension(buyer): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> OrderResult<Json<MessageResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    let id = parse_order_id(&id)?;
    let outcome = CancelPendingOrderUseCase::new(state.orders.clone())
        .execute(buyer.id, id)
        .await?;

    Ok(Json(MessageResponse {
        message: outcome.message(),
    }))
}

/// GET /api/orders/staff
pub async fn list_all_orders<O, C, A, G>(
    State(state): State<OrdersAppState<O, C, A, G>>,
) -> OrderResult<Json<OrderListResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    let views = ListOrdersUseCase::new(
        state.orders.clone(),
        state.catalog.clone(),
        state.accounts.clone(),
    )
    .all()
    .await?;

    Ok(Json(OrderListResponse {
        orders: views.into_iter().map(OrderResponse::for_staff).collect(),
    }))
}

/// PUT /api/orders/staff/{id}
pub async fn update_order<O, C, A, G>(
    State(state): State<OrdersAppState<O, C, A, G>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<StaffOrderUpdateRequest>,
) -> OrderResult<Json<OrderUpdatedResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    C: ProductRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    let id = parse_order_id(&id)?;
    let update = StaffUpdate::new(
        req.status.as_deref(),
        req.remaining_time.as_deref(),
        req.admin_comment.as_deref(),
    )?;

    let view = UpdateOrderUseCase::new(
        state.orders.clone(),
        state.catalog.clone(),
        state.accounts.clone(),
        state.audit.clone(),
    )
    .execute(&actor, id, update)
    .await?;

    Ok(Json(OrderUpdatedResponse {
        message: "Order updated",
        order: OrderResponse::for_staff(view),
    }))
}
