//! Application Configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use auth::{AuthConfig, NewAccountInput, parse_token_ttl};
use catalog::CatalogConfig;
use kernel::error::exposure::is_production_env;
use orders::OrdersConfig;
use orders::infra::stripe::DEFAULT_API_BASE;
use platform::cookie::parse_secure_override;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// `None` runs on in-memory stores
    pub database_url: Option<String>,
    pub production: bool,
    /// CORS allow-list
    pub frontend_origins: Vec<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    /// Owner created at startup when none exists
    pub owner: Option<NewAccountInput>,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
    pub orders: OrdersConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let production = is_production_env(var("APP_ENV").as_deref())
            || is_production_env(var("NODE_ENV").as_deref());

        let frontend_origins: Vec<String> = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string())
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let mut auth = AuthConfig {
            jwt_secret: var("JWT_SECRET"),
            cookie_secure: parse_secure_override(var("COOKIE_SECURE").as_deref()),
            password_pepper: var("PASSWORD_PEPPER").map(String::into_bytes),
            ..AuthConfig::default()
        };
        if let Some(raw) = var("JWT_EXPIRES_IN") {
            auth.token_ttl = parse_token_ttl(&raw)
                .with_context(|| format!("JWT_EXPIRES_IN has an invalid value: {raw}"))?;
        }
        if let Some(raw) = var("JWT_REFRESH_WINDOW_SECONDS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .context("JWT_REFRESH_WINDOW_SECONDS must be a number of seconds")?;
            auth.refresh_window = Duration::from_secs(secs);
        }

        let mut catalog = CatalogConfig::default();
        if let Some(dir) = var("UPLOAD_DIR") {
            catalog.upload_dir = PathBuf::from(dir);
        }

        let pending_ttl = match var("PENDING_ORDER_TTL_HOURS") {
            Some(raw) => {
                let hours: u64 = raw
                    .trim()
                    .parse()
                    .context("PENDING_ORDER_TTL_HOURS must be a whole number of hours")?;
                (hours > 0).then(|| Duration::from_secs(hours * 3600))
            }
            None => None,
        };
        let orders = OrdersConfig {
            currency: var("PAYMENT_CURRENCY")
                .map(|c| c.trim().to_ascii_lowercase())
                .unwrap_or_else(|| "eur".to_string()),
            client_url: var("CLIENT_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
            trusted_origins: frontend_origins.clone(),
            pending_ttl,
        };

        let owner = match (var("OWNER_USERNAME"), var("OWNER_EMAIL"), var("OWNER_PASSWORD")) {
            (Some(username), Some(email), Some(password)) => Some(NewAccountInput {
                username: Some(username),
                email: Some(email),
                password: Some(password),
            }),
            _ => None,
        };

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            production,
            frontend_origins,
            stripe_secret_key: var("STRIPE_SECRET_KEY"),
            stripe_api_base: var("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            owner,
            auth,
            catalog,
            orders,
        })
    }
}
