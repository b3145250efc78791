//! Order Entity
//!
//! Line prices and the total are copied from the catalog when the order is
//! placed and never recomputed.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, OrderId, ProductId};
use rust_decimal::Decimal;

use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

/// Maximum `remainingTime` length (characters)
pub const REMAINING_TIME_MAX_LENGTH: usize = 80;

/// Maximum `adminComment` length (characters)
pub const ADMIN_COMMENT_MAX_LENGTH: usize = 500;

/// Largest quantity accepted on a single cart line
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Catalog price at checkout time
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: AccountId,
    pub lines: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub remaining_time: String,
    pub admin_comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New pending order; the total is summed from the line snapshots
    pub fn place(user_id: AccountId, lines: Vec<OrderLine>) -> Self {
        let now = Utc::now();
        let total_amount = lines.iter().map(OrderLine::subtotal).sum();
        Self {
            id: OrderId::new(),
            user_id,
            lines,
            total_amount,
            status: OrderStatus::Pending,
            remaining_time: String::new(),
            admin_comment: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.lines.iter().map(|l| l.product_id)
    }

    /// Staff edit: forward status move plus the two free-text notes
    pub fn apply_staff_update(&mut self, update: StaffUpdate) -> OrderResult<()> {
        self.status.check_transition(update.status)?;
        self.status = update.status;
        self.remaining_time = update.remaining_time;
        self.admin_comment = update.admin_comment;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Validated staff edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffUpdate {
    pub status: OrderStatus,
    pub remaining_time: String,
    pub admin_comment: String,
}

impl StaffUpdate {
    /// Missing notes become empty strings
    pub fn new(
        status: Option<&str>,
        remaining_time: Option<&str>,
        admin_comment: Option<&str>,
    ) -> OrderResult<Self> {
        Ok(Self {
            status: OrderStatus::parse_settable(status)?,
            remaining_time: bounded_note("remainingTime", remaining_time, REMAINING_TIME_MAX_LENGTH)?,
            admin_comment: bounded_note("adminComment", admin_comment, ADMIN_COMMENT_MAX_LENGTH)?,
        })
    }
}

fn bounded_note(field: &str, raw: Option<&str>, max: usize) -> OrderResult<String> {
    let value = raw.unwrap_or_default().trim();
    if value.chars().count() > max {
        return Err(OrderError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}
