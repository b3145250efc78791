//! Repository Trait

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, OrderId};

use crate::domain::order::Order;
use crate::error::OrderResult;

#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    /// Persist the order together with its lines
    async fn create_order(&self, order: &Order) -> OrderResult<()>;

    async fn find_order(&self, id: OrderId) -> OrderResult<Option<Order>>;

    /// Newest first
    async fn list_orders_for_user(&self, user_id: AccountId) -> OrderResult<Vec<Order>>;

    /// Newest first
    async fn list_orders(&self) -> OrderResult<Vec<Order>>;

    /// Writes status, notes and `updated_at`; lines and total are immutable
    async fn update_order(&self, order: &Order) -> OrderResult<()>;

    /// Returns false when nothing was deleted
    async fn delete_order(&self, id: OrderId) -> OrderResult<bool>;

    /// Delete only while still pending; false if it moved on or is gone
    async fn delete_if_pending(&self, id: OrderId) -> OrderResult<bool>;

    /// Remove pending orders created before `cutoff`; returns how many
    async fn delete_pending_before(&self, cutoff: DateTime<Utc>) -> OrderResult<u64>;
}
