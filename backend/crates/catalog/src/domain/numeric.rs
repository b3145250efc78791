//! Numeric form fields
//!
//! Admin forms send prices and preparation times either as JSON numbers or
//! as strings; both are accepted.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    fn text(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }

    /// Non-negative price, rounded to cents
    pub fn to_price(&self) -> CatalogResult<Decimal> {
        let text = self.text();
        let price = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| CatalogError::InvalidPrice)?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CatalogError::InvalidPrice);
        }
        Ok(price.round_dp(2))
    }

    /// Non-negative minutes; blank means "not set"
    pub fn to_preparation_time(&self) -> CatalogResult<Option<f64>> {
        if self.is_blank() {
            return Ok(None);
        }
        let value: f64 = self
            .text()
            .parse()
            .map_err(|_| CatalogError::InvalidPreparationTime)?;
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::InvalidPreparationTime);
        }
        Ok(Some(value))
    }
}
