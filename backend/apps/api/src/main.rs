//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;
mod dashboard;

use std::net::SocketAddr;
use std::sync::Arc;

use audit::{AuditRepository, MemoryAuditRepository, PgAuditRepository};
use auth::{AccountRepository, BootstrapOwnerUseCase, MemoryAccountRepository, PgAccountRepository};
use catalog::{CategoryRepository, MemoryCatalogRepository, PgCatalogRepository, ProductRepository};
use orders::{
    MemoryOrderRepository, OrderRepository, PgOrderRepository, StripeGateway,
    SweepPendingOrdersUseCase,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{Stores, build_router};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,orders=info,audit=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    kernel::error::exposure::set_production(config.production);

    if config.auth.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set, login and registration will fail");
    }
    if config.stripe_secret_key.is_none() {
        tracing::warn!("STRIPE_SECRET_KEY is not set, checkout is disabled");
    }

    tokio::fs::create_dir_all(&config.catalog.upload_dir).await?;

    let gateway = Arc::new(StripeGateway::new(
        config.stripe_secret_key.clone(),
        config.stripe_api_base.clone(),
    ));

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let stores = Stores {
                accounts: Arc::new(PgAccountRepository::new(pool.clone())),
                catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
                orders: Arc::new(PgOrderRepository::new(pool.clone())),
                audit: Arc::new(PgAuditRepository::new(pool)),
            };
            serve(config, stores, gateway).await
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, using in-memory stores (data is lost on exit)");

            let stores = Stores {
                accounts: Arc::new(MemoryAccountRepository::new()),
                catalog: Arc::new(MemoryCatalogRepository::new()),
                orders: Arc::new(MemoryOrderRepository::new()),
                audit: Arc::new(MemoryAuditRepository::new()),
            };
            serve(config, stores, gateway).await
        }
    }
}

async fn serve<A, C, O, L>(
    config: AppConfig,
    stores: Stores<A, C, O, L>,
    gateway: Arc<StripeGateway>,
) -> anyhow::Result<()>
where
    A: AccountRepository + Send + Sync + 'static,
    C: CategoryRepository + ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    L: AuditRepository + Send + Sync + 'static,
{
    // Startup: owner bootstrap is required to succeed
    if let Some(owner) = config.owner.clone() {
        BootstrapOwnerUseCase::new(stores.accounts.clone(), Arc::new(config.auth.clone()))
            .execute(owner)
            .await?;
    }

    // Startup cleanup: abandoned checkouts
    // Errors here should not prevent server startup
    if let Some(ttl) = config.orders.pending_ttl {
        match SweepPendingOrdersUseCase::new(stores.orders.clone())
            .execute(ttl)
            .await
        {
            Ok(orders_deleted) => {
                tracing::info!(orders_deleted, "Pending order sweep completed");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Pending order sweep failed, continuing anyway"
                );
            }
        }
    }

    let app = build_router(stores, gateway, &config);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
