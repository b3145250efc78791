//! Checkout Use Case
//!
//! Cart → priced pending order → provider checkout session. The whole cart
//! is rejected on the first bad line, so no partial order is ever stored.

use std::collections::HashMap;
use std::sync::Arc;

use auth::CurrentAccount;
use catalog::{Product, ProductRepository};
use kernel::id::{OrderId, ProductId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::application::config::OrdersConfig;
use crate::domain::gateway::{
    CheckoutSessionRequest, LINE_DESCRIPTION_MAX_LENGTH, LineItem, PaymentGateway,
};
use crate::domain::order::{MAX_LINE_QUANTITY, Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

/// One cart line as submitted by the client
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutput {
    pub checkout_url: String,
    pub session_id: String,
    pub order_id: OrderId,
}

pub struct CheckoutUseCase<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGateway,
{
    orders: Arc<O>,
    products: Arc<P>,
    gateway: Arc<G>,
    config: Arc<OrdersConfig>,
}

impl<O, P, G> CheckoutUseCase<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGateway,
{
    pub fn new(orders: Arc<O>, products: Arc<P>, gateway: Arc<G>, config: Arc<OrdersConfig>) -> Self {
        Self {
            orders,
            products,
            gateway,
            config,
        }
    }

    /// `origin` is the request's `Origin` header, used for callbacks when trusted
    pub async fn execute(
        &self,
        buyer: &CurrentAccount,
        items: Vec<CartItem>,
        origin: Option<&str>,
    ) -> OrderResult<CheckoutOutput> {
        if !self.gateway.is_configured() {
            return Err(OrderError::PaymentNotConfigured);
        }
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let priced = self.price_cart(&items).await?;
        let lines = priced
            .iter()
            .map(|(product, quantity)| OrderLine {
                product_id: product.id,
                quantity: *quantity,
                unit_price: product.price,
            })
            .collect();

        let order = Order::place(buyer.id, lines);
        self.orders.create_order(&order).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %buyer.id,
            total = %order.total_amount,
            "Pending order created"
        );

        let base = self.config.callback_base(origin);
        let request = CheckoutSessionRequest {
            order_id: order.id,
            user_id: buyer.id,
            line_items: priced
                .iter()
                .map(|(product, quantity)| self.line_item(product, *quantity))
                .collect(),
            success_url: format!("{base}/checkout?success=true&orderId={}", order.id),
            cancel_url: format!("{base}/checkout?canceled=true&orderId={}", order.id),
        };

        let session = match self.gateway.create_checkout_session(&request).await {
            Ok(session) => session,
            Err(e) => {
                self.discard(order.id).await;
                return Err(e);
            }
        };

        tracing::info!(order_id = %order.id, session_id = %session.id, "Checkout session created");

        Ok(CheckoutOutput {
            checkout_url: session.url,
            session_id: session.id,
            order_id: order.id,
        })
    }

    /// One batch lookup; every line must name a known product with quantity in
    /// `1..=MAX_LINE_QUANTITY`
    async fn price_cart(&self, items: &[CartItem]) -> OrderResult<Vec<(Product, u32)>> {
        let mut wanted = Vec::with_capacity(items.len());
        for item in items {
            let id = ProductId::parse(&item.product_id).ok_or(OrderError::InvalidCart)?;
            let quantity = u32::try_from(item.quantity)
                .ok()
                .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
                .ok_or(OrderError::InvalidCart)?;
            wanted.push((id, quantity));
        }

        let ids: Vec<ProductId> = wanted.iter().map(|(id, _)| *id).collect();
        let found: HashMap<ProductId, Product> = self
            .products
            .find_products(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        wanted
            .into_iter()
            .map(|(id, quantity)| {
                found
                    .get(&id)
                    .cloned()
                    .map(|p| (p, quantity))
                    .ok_or(OrderError::InvalidCart)
            })
            .collect()
    }

    fn line_item(&self, product: &Product, quantity: u32) -> LineItem {
        LineItem {
            name: product.title.clone(),
            description: product
                .description
                .chars()
                .take(LINE_DESCRIPTION_MAX_LENGTH)
                .collect(),
            unit_amount: minor_units(product.price),
            quantity,
            currency: self.config.currency.clone(),
            image: Some(product.image.as_str())
                .filter(|i| i.starts_with("http://") || i.starts_with("https://"))
                .map(str::to_string),
        }
    }

    /// Compensating delete after a provider failure
    async fn discard(&self, id: OrderId) {
        match self.orders.delete_order(id).await {
            Ok(_) => tracing::warn!(order_id = %id, "Pending order discarded after payment failure"),
            Err(e) => tracing::error!(
                order_id = %id,
                error = %e,
                "Could not discard pending order after payment failure"
            ),
        }
    }
}

/// Price in cents, rounded half away from zero
pub fn minor_units(price: Decimal) -> i64 {
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}
