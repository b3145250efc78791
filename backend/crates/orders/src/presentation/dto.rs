//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, OrderId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::{CartItem, CheckoutOutput, OrderView};
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

// ============================================================================
// Checkout
// ============================================================================

/// Kept loose so a malformed cart is a 400 from the use case, not a
/// deserialization rejection
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    pub items: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuantityInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl QuantityInput {
    /// Non-integral or unparsable quantities become 0 and fail the cart
    fn to_quantity(&self) -> i64 {
        match self {
            QuantityInput::Integer(n) => *n,
            QuantityInput::Float(f) if f.fract() == 0.0 => *f as i64,
            QuantityInput::Float(_) => 0,
            QuantityInput::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest {
    product_id: Option<String>,
    quantity: Option<QuantityInput>,
}

impl CheckoutRequest {
    pub fn into_cart(self) -> OrderResult<Vec<CartItem>> {
        let items = match self.items {
            Some(serde_json::Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(OrderError::EmptyCart),
        };

        items
            .into_iter()
            .map(|raw| {
                let item: CartItemRequest =
                    serde_json::from_value(raw).map_err(|_| OrderError::InvalidCart)?;
                Ok(CartItem {
                    product_id: item.product_id.unwrap_or_default(),
                    quantity: item.quantity.as_ref().map(QuantityInput::to_quantity).unwrap_or(0),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
    pub order_id: OrderId,
}

impl From<CheckoutOutput> for CheckoutResponse {
    fn from(out: CheckoutOutput) -> Self {
        Self {
            checkout_url: out.checkout_url,
            session_id: out.session_id,
            order_id: out.order_id,
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BuyerRef {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub username: String,
    pub email: String,
}

/// Customers see their own id; staff see the resolved buyer (or null)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderUser {
    Id(AccountId),
    Buyer(Option<BuyerRef>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRef {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub image: String,
    /// Live catalog price, staff listing only
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    /// Null once the product is deleted
    pub product: Option<ProductRef>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user: OrderUser,
    pub products: Vec<OrderLineResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub remaining_time: String,
    pub admin_comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    fn build(view: OrderView, staff: bool) -> Self {
        let OrderView {
            order,
            products,
            buyer,
        } = view;

        let user = if staff {
            OrderUser::Buyer(buyer.map(|b| BuyerRef {
                id: b.id,
                username: b.username.to_string(),
                email: b.email.to_string(),
            }))
        } else {
            OrderUser::Id(order.user_id)
        };

        let lines = order
            .lines
            .iter()
            .zip(products)
            .map(|(line, product)| OrderLineResponse {
                product: product.map(|p| ProductRef {
                    id: p.id,
                    title: p.title,
                    image: p.image,
                    price: staff.then_some(p.price),
                }),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        Self {
            id: order.id,
            user,
            products: lines,
            total_amount: order.total_amount,
            status: order.status,
            remaining_time: order.remaining_time,
            admin_comment: order.admin_comment,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// `products.product` as `{_id,title,image}`, `user` as an id
    pub fn for_customer(view: OrderView) -> Self {
        Self::build(view, false)
    }

    /// `user` as `{_id,username,email}`, products with their price
    pub fn for_staff(view: OrderView) -> Self {
        Self::build(view, true)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffOrderUpdateRequest {
    pub status: Option<String>,
    pub remaining_time: Option<String>,
    pub admin_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdatedResponse {
    pub message: &'static str,
    pub order: OrderResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
