//! Catalog Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("Invalid category id")]
    InvalidCategoryId,

    #[error("Invalid product id")]
    InvalidProductId,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Category already exists")]
    CategoryExists,

    /// Rename collides with another category
    #[error("Category name already in use")]
    CategoryNameTaken,

    #[error("Cannot delete category used by products")]
    CategoryInUse,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Invalid preparationTime")]
    InvalidPreparationTime,

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------
    #[error("Image file is required")]
    ImageRequired,

    #[error("Only image files are allowed")]
    UnsupportedImageType,

    #[error("Image exceeds the 5MB limit")]
    ImageTooLarge,

    #[error("Failed to store image")]
    Storage(#[source] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_)
            | CatalogError::InvalidCategoryId
            | CatalogError::InvalidProductId
            | CatalogError::CategoryInUse
            | CatalogError::InvalidPrice
            | CatalogError::InvalidPreparationTime
            | CatalogError::ImageRequired
            | CatalogError::UnsupportedImageType => ErrorKind::BadRequest,
            CatalogError::CategoryNotFound | CatalogError::ProductNotFound => ErrorKind::NotFound,
            CatalogError::CategoryExists | CatalogError::CategoryNameTaken => ErrorKind::Conflict,
            CatalogError::ImageTooLarge => ErrorKind::PayloadTooLarge,
            CatalogError::Database(e) => classify_sqlx(e).0,
            CatalogError::Storage(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            CatalogError::Database(e) => {
                let (kind, message) = classify_sqlx(&e);
                AppError::new(kind, message).with_source(e)
            }
            CatalogError::Storage(e) => AppError::new(kind, "Failed to store image").with_source(e),
            CatalogError::Internal(cause) => {
                AppError::new(kind, "Internal error").with_source(cause)
            }
            _ => AppError::new(kind, self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Storage(e) => {
                tracing::error!(error = %e, "Image write failed");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::conversions::render_body;

    #[test]
    fn test_kinds() {
        assert_eq!(CatalogError::CategoryInUse.kind(), ErrorKind::BadRequest);
        assert_eq!(CatalogError::CategoryExists.kind(), ErrorKind::Conflict);
        assert_eq!(CatalogError::ImageTooLarge.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(
            CatalogError::Storage(std::io::Error::other("disk full")).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_database_cause_reaches_development_detail() {
        let err = CatalogError::Database(sqlx::Error::Protocol(
            "relation \"products\" does not exist".into(),
        ))
        .into_app_error();

        let body = render_body(&err, false);
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "Database error");
        assert!(
            body["detail"][0]
                .as_str()
                .unwrap()
                .contains("relation \"products\" does not exist")
        );

        let body = render_body(&err, true);
        assert_eq!(body["message"], "Internal Server Error");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_storage_cause_is_kept() {
        let err = CatalogError::Storage(std::io::Error::other("disk full")).into_app_error();
        assert_eq!(err.message(), "Failed to store image");
        assert_eq!(err.source_chain(), vec!["disk full".to_string()]);
    }
}
