//! Orders configuration

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// ISO currency code for line items
    pub currency: String,
    /// Callback base when the request origin is not trusted
    pub client_url: String,
    /// Origins allowed to receive checkout callbacks
    pub trusted_origins: Vec<String>,
    /// Abandoned pending orders older than this are swept at startup
    pub pending_ttl: Option<Duration>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            currency: "eur".to_string(),
            client_url: "http://localhost:5173".to_string(),
            trusted_origins: vec!["http://localhost:5173".to_string()],
            pending_ttl: None,
        }
    }
}

impl OrdersConfig {
    /// Base URL for success/cancel callbacks
    pub fn callback_base<'a>(&'a self, origin: Option<&'a str>) -> &'a str {
        let base = origin
            .map(|o| o.trim_end_matches('/'))
            .filter(|o| self.trusted_origins.iter().any(|t| t.trim_end_matches('/') == *o))
            .unwrap_or(self.client_url.as_str());
        base.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_base() {
        let config = OrdersConfig {
            client_url: "https://shop.example/".to_string(),
            trusted_origins: vec!["https://admin.example".to_string()],
            ..Default::default()
        };

        assert_eq!(config.callback_base(Some("https://admin.example")), "https://admin.example");
        assert_eq!(config.callback_base(Some("https://evil.example")), "https://shop.example");
        assert_eq!(config.callback_base(None), "https://shop.example");
    }
}
