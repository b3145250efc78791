//! PostgreSQL Order Repository
//!
//! `orders` holds the header, `order_items` the snapshot lines (ordered by
//! `position`). Line rows are removed with their order (ON DELETE CASCADE).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, OrderId, ProductId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::{Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

const ORDER_COLUMNS: &str =
    "id, user_id, total_amount, status, remaining_time, admin_comment, created_at, updated_at";

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach lines to header rows with one extra query
    async fn hydrate(&self, rows: Vec<OrderRow>) -> OrderResult<Vec<Order>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, quantity, unit_price FROM order_items \
             WHERE order_id = ANY($1) ORDER BY order_id, position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lines: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for item in items {
            lines.entry(item.order_id).or_default().push(item.into_line()?);
        }

        rows.into_iter()
            .map(|row| {
                let order_lines = lines.remove(&row.id).unwrap_or_default();
                row.into_order(order_lines)
            })
            .collect()
    }

    async fn fetch_many(&self, sql: &str, user_id: Option<AccountId>) -> OrderResult<Vec<Order>> {
        let mut query = sqlx::query_as::<_, OrderRow>(sql);
        if let Some(user_id) = user_id {
            query = query.bind(user_id.into_uuid());
        }
        let rows = query.fetch_all(&self.pool).await?;
        self.hydrate(rows).await
    }
}

impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, order: &Order) -> OrderResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, user_id, total_amount, status, remaining_time, admin_comment, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total_amount)
        .bind(order.status.as_str())
        .bind(&order.remaining_time)
        .bind(&order.admin_comment)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                OrderError::Validation(format!("Quantity {} is out of range", line.quantity))
            })?;
            sqlx::query(
                "INSERT INTO order_items (order_id, position, product_id, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id.as_uuid())
            .bind(position as i32)
            .bind(line.product_id.as_uuid())
            .bind(quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> OrderResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_orders_for_user(&self, user_id: AccountId) -> OrderResult<Vec<Order>> {
        self.fetch_many(
            &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"),
            Some(user_id),
        )
        .await
    }

    async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        self.fetch_many(
            &format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"),
            None,
        )
        .await
    }

    async fn update_order(&self, order: &Order) -> OrderResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2, remaining_time = $3, admin_comment = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(order.id.as_uuid())
        .bind(order.status.as_str())
        .bind(&order.remaining_time)
        .bind(&order.admin_comment)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::OrderNotFound);
        }
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> OrderResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_pending(&self, id: OrderId) -> OrderResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND status = $2")
            .bind(id.as_uuid())
            .bind(OrderStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_pending_before(&self, cutoff: DateTime<Utc>) -> OrderResult<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE status = $1 AND created_at < $2")
            .bind(OrderStatus::Pending.as_str())
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    total_amount: Decimal,
    status: String,
    remaining_time: String,
    admin_comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> OrderResult<Order> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| OrderError::Internal(format!("unknown order status {}", self.status)))?;
        Ok(Order {
            id: OrderId::from_uuid(self.id),
            user_id: AccountId::from_uuid(self.user_id),
            lines,
            total_amount: self.total_amount,
            status,
            remaining_time: self.remaining_time,
            admin_comment: self.admin_comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
}

impl OrderItemRow {
    fn into_line(self) -> OrderResult<OrderLine> {
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| OrderError::Internal(format!("negative quantity on order {}", self.order_id)))?;
        Ok(OrderLine {
            product_id: ProductId::from_uuid(self.product_id),
            quantity,
            unit_price: self.unit_price,
        })
    }
}
