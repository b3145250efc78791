//! Product Entity

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ProductId};
use rust_decimal::Decimal;

use crate::domain::category::Category;
use crate::error::{CatalogError, CatalogResult};

/// Maximum title length (characters)
pub const TITLE_MAX_LENGTH: usize = 120;

/// Maximum description length (characters)
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Upload path (`/uploads/...`) or absolute URL
    pub image: String,
    pub description: String,
    /// Minutes
    pub preparation_time: Option<f64>,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

/// Product with its category resolved; `None` if the category row is gone
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    pub category: Option<Category>,
}

pub fn validate_title(raw: &str) -> CatalogResult<String> {
    bounded("Title", raw, TITLE_MAX_LENGTH)
}

pub fn validate_description(raw: &str) -> CatalogResult<String> {
    bounded("Description", raw, DESCRIPTION_MAX_LENGTH)
}

pub fn validate_image(raw: &str) -> CatalogResult<String> {
    let image = raw.trim();
    if image.is_empty() {
        return Err(CatalogError::Validation("Image is required".to_string()));
    }
    Ok(image.to_string())
}

fn bounded(field: &str, raw: &str, max: usize) -> CatalogResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(CatalogError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fields() {
        assert_eq!(validate_title("  Croissant ").unwrap(), "Croissant");
        assert!(validate_title(&"t".repeat(121)).is_err());
        assert!(validate_description(&"d".repeat(2000)).is_ok());
        assert!(validate_description(&"d".repeat(2001)).is_err());
        assert!(validate_image("   ").is_err());
    }
}
