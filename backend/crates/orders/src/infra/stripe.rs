//! Stripe Checkout adapter
//!
//! `POST /v1/checkout/sessions` with a form-encoded body, authenticated with
//! the secret key as a bearer token.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::gateway::{CheckoutSession, CheckoutSessionRequest, PaymentGateway};
use crate::error::{OrderError, OrderResult};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: Option<String>,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: Option<String>, api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            secret_key: secret_key.filter(|k| !k.trim().is_empty()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SessionBody {
    id: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Stripe's bracketed form encoding of a session request
pub fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut fields = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("metadata[orderId]".to_string(), request.order_id.to_string()),
        ("metadata[userId]".to_string(), request.user_id.to_string()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let key = |suffix: &str| format!("line_items[{i}]{suffix}");
        fields.push((key("[quantity]"), item.quantity.to_string()));
        fields.push((key("[price_data][currency]"), item.currency.clone()));
        fields.push((key("[price_data][unit_amount]"), item.unit_amount.to_string()));
        fields.push((key("[price_data][product_data][name]"), item.name.clone()));
        if !item.description.is_empty() {
            fields.push((
                key("[price_data][product_data][description]"),
                item.description.clone(),
            ));
        }
        if let Some(image) = &item.image {
            fields.push((key("[price_data][product_data][images][0]"), image.clone()));
        }
    }

    fields
}

impl PaymentGateway for StripeGateway {
    fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> OrderResult<CheckoutSession> {
        let key = self
            .secret_key
            .as_deref()
            .ok_or(OrderError::PaymentNotConfigured)?;

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(key)
            .form(&form_fields(request))
            .send()
            .await
            .map_err(|e| OrderError::Payment(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("status {status}"));
            return Err(OrderError::Payment(message));
        }

        let body: SessionBody = response
            .json()
            .await
            .map_err(|e| OrderError::Payment(e.to_string()))?;
        let url = body
            .url
            .ok_or_else(|| OrderError::Payment("session has no checkout URL".to_string()))?;

        Ok(CheckoutSession { id: body.id, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::{AccountId, OrderId};

    use crate::domain::gateway::LineItem;

    fn request() -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            order_id: OrderId::new(),
            user_id: AccountId::new(),
            line_items: vec![LineItem {
                name: "Sacher".into(),
                description: "Chocolate".into(),
                unit_amount: 1250,
                quantity: 2,
                currency: "eur".into(),
                image: Some("https://cdn.example/s.png".into()),
            }],
            success_url: "http://localhost:5173/checkout?success=true".into(),
            cancel_url: "http://localhost:5173/checkout?canceled=true".into(),
        }
    }

    fn value<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_form_fields() {
        let req = request();
        let fields = form_fields(&req);

        assert_eq!(value(&fields, "mode"), Some("payment"));
        assert_eq!(value(&fields, "line_items[0][quantity]"), Some("2"));
        assert_eq!(
            value(&fields, "line_items[0][price_data][unit_amount]"),
            Some("1250")
        );
        assert_eq!(
            value(&fields, "line_items[0][price_data][product_data][images][0]"),
            Some("https://cdn.example/s.png")
        );
        let order_id = req.order_id.to_string();
        assert_eq!(value(&fields, "metadata[orderId]"), Some(order_id.as_str()));
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        assert!(!StripeGateway::new(Some("  ".into()), DEFAULT_API_BASE).is_configured());
        assert!(!StripeGateway::new(None, DEFAULT_API_BASE).is_configured());
        assert!(StripeGateway::new(Some("sk_test_x".into()), DEFAULT_API_BASE).is_configured());
    }
}
