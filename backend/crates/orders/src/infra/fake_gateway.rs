//! Recording payment gateway for tests and offline development

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::gateway::{CheckoutSession, CheckoutSessionRequest, PaymentGateway};
use crate::error::{OrderError, OrderResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Succeed,
    Fail,
    Unconfigured,
}

/// Records every request and answers with a deterministic session
#[derive(Clone, Default)]
pub struct FakePaymentGateway {
    mode: Mode,
    requests: Arc<Mutex<Vec<CheckoutSessionRequest>>>,
}

impl FakePaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the provider were down
    pub fn failing() -> Self {
        Self {
            mode: Mode::Fail,
            ..Self::default()
        }
    }

    /// Reports missing credentials
    pub fn unconfigured() -> Self {
        Self {
            mode: Mode::Unconfigured,
            ..Self::default()
        }
    }

    pub async fn last_request(&self) -> Option<CheckoutSessionRequest> {
        self.requests.lock().await.last().cloned()
    }
}

impl PaymentGateway for FakePaymentGateway {
    fn is_configured(&self) -> bool {
        self.mode != Mode::Unconfigured
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> OrderResult<CheckoutSession> {
        self.requests.lock().await.push(request.clone());

        match self.mode {
            Mode::Succeed => {
                let id = format!("cs_test_{}", request.order_id.as_uuid().simple());
                Ok(CheckoutSession {
                    url: format!("https://checkout.test/{id}"),
                    id,
                })
            }
            Mode::Fail => Err(OrderError::Payment("provider unavailable".to_string())),
            Mode::Unconfigured => Err(OrderError::PaymentNotConfigured),
        }
    }
}
