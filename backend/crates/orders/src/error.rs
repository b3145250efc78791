//! Order Error Types

use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use auth::AuthError;
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("Cart items are required")]
    EmptyCart,

    /// Unknown product or quantity below one on any line
    #[error("Invalid cart items")]
    InvalidCart,

    #[error("Invalid order id")]
    InvalidOrderId,

    #[error("Invalid status")]
    InvalidStatus,

    #[error("Cannot move order from {from} back to {to}")]
    BackwardTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Order not found")]
    OrderNotFound,

    // ------------------------------------------------------------------
    // Payment provider
    // ------------------------------------------------------------------
    #[error("Stripe is not configured on server")]
    PaymentNotConfigured,

    #[error("Payment provider error: {0}")]
    Payment(String),

    // ------------------------------------------------------------------
    // Collaborating stores
    // ------------------------------------------------------------------
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Accounts(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::Validation(_)
            | OrderError::EmptyCart
            | OrderError::InvalidCart
            | OrderError::InvalidOrderId
            | OrderError::InvalidStatus
            | OrderError::BackwardTransition { .. } => ErrorKind::BadRequest,
            OrderError::OrderNotFound => ErrorKind::NotFound,
            OrderError::PaymentNotConfigured | OrderError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            OrderError::Payment(_) => ErrorKind::BadGateway,
            OrderError::Catalog(e) => e.kind(),
            OrderError::Accounts(e) => e.kind(),
            OrderError::Database(e) => classify_sqlx(e).0,
        }
    }

    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            OrderError::Database(e) => {
                let (kind, message) = classify_sqlx(&e);
                AppError::new(kind, message).with_source(e)
            }
            OrderError::Catalog(e) => e.into_app_error(),
            OrderError::Accounts(e) => e.into_app_error(),
            OrderError::PaymentNotConfigured => AppError::new(kind, self.to_string())
                .with_action("Set STRIPE_SECRET_KEY on the server"),
            OrderError::Internal(cause) => AppError::new(kind, "Internal error").with_source(cause),
            _ => AppError::new(kind, self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            OrderError::Database(e) => {
                tracing::error!(error = %e, "Order database error");
            }
            OrderError::Payment(msg) => {
                tracing::error!(message = %msg, "Checkout session creation failed");
            }
            OrderError::PaymentNotConfigured => {
                tracing::error!("Checkout attempted without a payment provider key");
            }
            OrderError::Internal(msg) => {
                tracing::error!(message = %msg, "Order internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Order error");
            }
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
