//! Dashboard statistics for the admin home page

use std::sync::Arc;

use auth::{AccountRepository, RoleCounts};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use catalog::{CategoryRepository, ProductRepository};
use serde::Serialize;

pub struct DashboardState<A, C> {
    pub accounts: Arc<A>,
    pub catalog: Arc<C>,
}

impl<A, C> Clone for DashboardState<A, C> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub users: i64,
    pub admins: i64,
    pub owners: i64,
    pub categories: i64,
    pub products: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

/// `GET /stats` (admin-or-owner)
pub fn dashboard_router<A, C>(state: DashboardState<A, C>) -> Router
where
    A: AccountRepository + Send + Sync + 'static,
    C: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/stats", get(stats::<A, C>))
        .with_state(state)
}

async fn stats<A, C>(
    State(state): State<DashboardState<A, C>>,
) -> Result<Json<StatsResponse>, Response>
where
    A: AccountRepository + Send + Sync + 'static,
    C: CategoryRepository + ProductRepository + Send + Sync + 'static,
{
    let RoleCounts {
        users,
        admins,
        owners,
    } = state
        .accounts
        .count_by_role()
        .await
        .map_err(IntoResponse::into_response)?;
    let categories = state
        .catalog
        .count_categories()
        .await
        .map_err(IntoResponse::into_response)?;
    let products = state
        .catalog
        .count_products()
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(StatsResponse {
        stats: Stats {
            users,
            admins,
            owners,
            categories,
            products,
        },
    }))
}
