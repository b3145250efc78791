//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` renderer.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("Invalid account type")]
    InvalidAccountType,

    /// Unknown account or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Staff login attempted with a plain user account
    #[error("Admin account required")]
    AdminAccountRequired,

    // ------------------------------------------------------------------
    // Guard
    // ------------------------------------------------------------------
    #[error("Not authorized: no token")]
    MissingToken,

    /// Token verified but the account no longer exists
    #[error("Not authorized: user not found")]
    AccountGone,

    #[error("Not authorized: token expired")]
    TokenExpired,

    #[error("Not authorized: invalid token")]
    TokenInvalid,

    #[error("Admin/Owner access required")]
    AdminOrOwnerRequired,

    #[error("Owner access required")]
    OwnerRequired,

    /// Account store failed while authenticating
    #[error("Authentication service unavailable")]
    ServiceUnavailable(String),

    // ------------------------------------------------------------------
    // Account management
    // ------------------------------------------------------------------
    #[error("Username or email already in use")]
    IdentityTaken,

    #[error("Username already in use")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Admin account not found")]
    AdminNotFound,

    #[error("Owner account cannot be modified")]
    OwnerNotModifiable,

    #[error("Owner account cannot be deleted")]
    OwnerNotDeletable,

    /// Signing secret missing
    #[error("JWT secret not configured")]
    NotConfigured,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::InvalidAccountType => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::AccountGone
            | AuthError::TokenExpired
            | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::AdminAccountRequired
            | AuthError::AdminOrOwnerRequired
            | AuthError::OwnerRequired
            | AuthError::OwnerNotModifiable
            | AuthError::OwnerNotDeletable => ErrorKind::Forbidden,
            AuthError::UserNotFound | AuthError::AdminNotFound => ErrorKind::NotFound,
            AuthError::IdentityTaken | AuthError::UsernameTaken | AuthError::EmailTaken => {
                ErrorKind::Conflict
            }
            AuthError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::NotConfigured | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError, keeping the cause of server-side failures
    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            AuthError::Database(e) => {
                let (kind, message) = classify_sqlx(&e);
                AppError::new(kind, message).with_source(e)
            }
            AuthError::ServiceUnavailable(cause) => {
                AppError::new(kind, "Authentication service unavailable").with_source(cause)
            }
            AuthError::Internal(cause) => AppError::new(kind, "Internal error").with_source(cause),
            AuthError::MissingToken | AuthError::TokenExpired => {
                AppError::new(kind, self.to_string()).with_action("Please log in again")
            }
            _ => AppError::new(kind, self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::ServiceUnavailable(cause) => {
                tracing::error!(cause = %cause, "Account store unavailable during authentication");
            }
            AuthError::NotConfigured => {
                tracing::error!("JWT_SECRET is not set");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenInvalid => {
                tracing::warn!("Rejected invalid token");
            }
            AuthError::AdminAccountRequired
            | AuthError::AdminOrOwnerRequired
            | AuthError::OwnerRequired => {
                tracing::warn!(error = %self, "Forbidden request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<platform::password::PasswordError> for AuthError {
    fn from(err: platform::password::PasswordError) -> Self {
        if err.is_policy() {
            AuthError::Validation(err.to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::AccountGone,
            AuthError::TokenExpired,
            AuthError::TokenInvalid,
        ] {
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(
            AuthError::ServiceUnavailable("pool closed".into()).kind(),
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "Not authorized: no token");
        assert_eq!(
            AuthError::AdminOrOwnerRequired.to_string(),
            "Admin/Owner access required"
        );
        assert_eq!(AuthError::NotConfigured.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_internal_cause_is_detail_not_message() {
        let err = AuthError::Internal("Stored password hash unreadable".into()).into_app_error();
        assert_eq!(err.message(), "Internal error");
        assert_eq!(
            err.source_chain(),
            vec!["Stored password hash unreadable".to_string()]
        );
    }

    #[test]
    fn test_expired_token_carries_action() {
        let err = AuthError::TokenExpired.into_app_error();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.action(), Some("Please log in again"));
    }
}
