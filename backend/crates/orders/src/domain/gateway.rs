//! Payment Gateway Port
//!
//! The provider is opaque: it receives priced line items plus callback URLs
//! and hands back a hosted checkout session.

use kernel::id::{AccountId, OrderId};

use crate::error::OrderResult;

/// Maximum line-item description sent to the provider (characters)
pub const LINE_DESCRIPTION_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    /// Minor currency units (cents)
    pub unit_amount: i64,
    pub quantity: u32,
    pub currency: String,
    /// Only absolute http(s) URLs are forwarded
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub order_id: OrderId,
    pub user_id: AccountId,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Provider-issued session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    /// False when no provider credentials are set
    fn is_configured(&self) -> bool;

    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> OrderResult<CheckoutSession>;
}
