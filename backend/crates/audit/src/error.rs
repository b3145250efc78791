//! Audit Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    /// Stored target type is not one of admin/category/product/order
    #[error("Unknown audit target type: {0}")]
    UnknownTargetType(String),

    /// The account store could not resolve actors
    #[error("Actor lookup failed: {0}")]
    Directory(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuditError::Database(e) => classify_sqlx(e).0,
            AuditError::Directory(_) => ErrorKind::ServiceUnavailable,
            AuditError::UnknownTargetType(_) | AuditError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            AuditError::Database(e) => {
                let (kind, message) = classify_sqlx(&e);
                AppError::new(kind, message).with_source(e)
            }
            AuditError::Directory(cause) => {
                AppError::new(kind, "Actor lookup failed").with_source(cause)
            }
            _ => AppError::new(kind, self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuditError::Database(e) => {
                tracing::error!(error = %e, "Audit database error");
            }
            _ => {
                tracing::error!(error = %self, "Audit error");
            }
        }
    }
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
