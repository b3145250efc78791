//! Error conversions
//!
//! Driver error classification and the terminal HTTP rendering of
//! [`AppError`].

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// SQLSTATE 23505 - a unique index rejected the write.
///
/// Uniqueness is pre-checked by the application, so this only fires when
/// two requests race between check and write.
#[cfg(feature = "sqlx")]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

/// Classify a driver error without consuming it.
///
/// Used by the per-crate error enums, which keep the `sqlx::Error` as their
/// source and only need the kind and a client-safe message.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            (ErrorKind::ServiceUnavailable, "Database connection pool exhausted")
        }
        // https://www.postgresql.org/docs/current/errcodes-appendix.html
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => (ErrorKind::Conflict, "Duplicate key value"),
            Some("23503") => (ErrorKind::Conflict, "Foreign key violation"),
            Some("23502") => (ErrorKind::BadRequest, "Required field is null"),
            Some("23514") => (ErrorKind::BadRequest, "Check constraint violation"),
            Some("53000" | "53100" | "53200" | "53300") => {
                (ErrorKind::ServiceUnavailable, "Database resource exhausted")
            }
            Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => {
                (ErrorKind::ServiceUnavailable, "Database unavailable")
            }
            _ => (ErrorKind::InternalServerError, "Database error"),
        },
        sqlx::Error::Io(_) => (ErrorKind::ServiceUnavailable, "Database connection error"),
        _ => (ErrorKind::InternalServerError, "Database error"),
    }
}

// ============================================================================
// Terminal rendering
// ============================================================================

/// JSON body for an error response.
///
/// `production` masks the message of 5xx errors and drops the source chain.
pub fn render_body(err: &AppError, production: bool) -> serde_json::Value {
    let message = if production && err.is_server_error() {
        err.kind().as_str().to_string()
    } else {
        err.message().to_string()
    };

    let mut body = serde_json::json!({
        "status": err.status_code(),
        "title": err.kind().as_str(),
        "message": message,
    });

    if let Some(action) = err.action() {
        body["action"] = serde_json::Value::from(action);
    }

    if !production {
        let chain = err.source_chain();
        if !chain.is_empty() {
            body["detail"] = serde_json::Value::from(chain);
        }
    }

    body
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = render_body(&self, super::exposure::is_production());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_body_development_keeps_detail() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError::internal("Failed to store image").with_source(io_err);

        let body = render_body(&err, false);
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "Failed to store image");
        assert_eq!(body["detail"][0], "disk full");
    }

    #[test]
    fn test_render_body_production_masks_server_errors() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError::internal("Failed to store image").with_source(io_err);

        let body = render_body(&err, true);
        assert_eq!(body["message"], "Internal Server Error");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_render_body_production_keeps_client_messages() {
        let err = AppError::conflict("Category already exists");
        let body = render_body(&err, true);
        assert_eq!(body["status"], 409);
        assert_eq!(body["message"], "Category already exists");
    }
}
