//! In-memory order store (development and tests)

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, OrderId};
use tokio::sync::RwLock;

use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

#[derive(Clone, Default)]
pub struct MemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

impl OrderRepository for MemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> OrderResult<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> OrderResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders_for_user(&self, user_id: AccountId) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(newest_first(
            orders
                .values()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(newest_first(self.orders.read().await.values().cloned().collect()))
    }

    async fn update_order(&self, order: &Order) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&order.id).ok_or(OrderError::OrderNotFound)?;
        stored.status = order.status;
        stored.remaining_time = order.remaining_time.clone();
        stored.admin_comment = order.admin_comment.clone();
        stored.updated_at = order.updated_at;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> OrderResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }

    async fn delete_if_pending(&self, id: OrderId) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;
        match orders.get(&id) {
            Some(order) if order.status.is_pending() => {
                orders.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_pending_before(&self, cutoff: DateTime<Utc>) -> OrderResult<u64> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|_, o| !(o.status.is_pending() && o.created_at < cutoff));
        Ok((before - orders.len()) as u64)
    }
}
