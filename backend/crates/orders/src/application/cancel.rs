//! Customer cancellation and stale-order sweep

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kernel::id::{AccountId, OrderId};

use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    /// Staff already picked the order up; nothing was changed
    AlreadyInProgress,
}

impl CancelOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CancelOutcome::Canceled => "Pending order canceled",
            CancelOutcome::AlreadyInProgress => "Order already in progress and cannot be canceled",
        }
    }
}

pub struct CancelPendingOrderUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> CancelPendingOrderUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    /// Another user's order is reported as not found
    pub async fn execute(&self, user_id: AccountId, id: OrderId) -> OrderResult<CancelOutcome> {
        let order = self
            .orders
            .find_order(id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or(OrderError::OrderNotFound)?;

        if !order.status.is_pending() || !self.orders.delete_if_pending(order.id).await? {
            return Ok(CancelOutcome::AlreadyInProgress);
        }

        tracing::info!(order_id = %order.id, user_id = %user_id, "Pending order canceled");
        Ok(CancelOutcome::Canceled)
    }
}

/// Deletes pending orders whose checkout was never completed
pub struct SweepPendingOrdersUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> SweepPendingOrdersUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    pub async fn execute(&self, ttl: Duration) -> OrderResult<u64> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| OrderError::Internal(format!("pending order TTL out of range: {e}")))?;
        let removed = self.orders.delete_pending_before(Utc::now() - ttl).await?;
        if removed > 0 {
            tracing::info!(removed, "Stale pending orders removed");
        }
        Ok(removed)
    }
}
