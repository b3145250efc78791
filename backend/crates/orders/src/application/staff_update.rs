//! Staff Order Update

use std::sync::Arc;

use audit::{AuditRecorder, NewAuditEntry, TargetType, actions};
use auth::{AccountRepository, CurrentAccount};
use catalog::ProductRepository;
use kernel::id::OrderId;

use crate::application::listing::{OrderView, with_buyers, with_products};
use crate::domain::order::StaffUpdate;
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

pub struct UpdateOrderUseCase<O, P, A>
where
    O: OrderRepository,
    P: ProductRepository,
    A: AccountRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
    accounts: Arc<A>,
    audit: AuditRecorder,
}

impl<O, P, A> UpdateOrderUseCase<O, P, A>
where
    O: OrderRepository,
    P: ProductRepository,
    A: AccountRepository,
{
    pub fn new(orders: Arc<O>, products: Arc<P>, accounts: Arc<A>, audit: AuditRecorder) -> Self {
        Self {
            orders,
            products,
            accounts,
            audit,
        }
    }

    /// Returns the order populated for rendering
    pub async fn execute(
        &self,
        actor: &CurrentAccount,
        id: OrderId,
        update: StaffUpdate,
    ) -> OrderResult<OrderView> {
        let mut order = self
            .orders
            .find_order(id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        order.apply_staff_update(update)?;
        self.orders.update_order(&order).await?;

        let views = with_products(self.products.as_ref(), vec![order]).await?;
        let view = with_buyers(self.accounts.as_ref(), views)
            .await?
            .pop()
            .ok_or(OrderError::OrderNotFound)?;

        let buyer = view
            .buyer
            .as_ref()
            .map(|b| b.username.to_string())
            .unwrap_or_else(|| "user".to_string());

        tracing::info!(
            order_id = %view.order.id,
            status = %view.order.status,
            actor_id = %actor.id,
            "Order updated"
        );
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::UPDATED_ORDER, TargetType::Order)
                .target(view.order.id.into_uuid(), format!("Order {}", view.order.id))
                .details(format!(
                    "{} updated order {} for {}",
                    actor.username, view.order.id, buyer
                )),
        );

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit::MemoryAuditRepository;
    use auth::MemoryAccountRepository;
    use catalog::MemoryCatalogRepository;
    use kernel::id::{AccountId, ProductId};
    use rust_decimal::Decimal;

    use crate::domain::order::{Order, OrderLine};
    use crate::domain::status::OrderStatus;
    use crate::infra::memory::MemoryOrderRepository;
    use crate::test_support::staff;

    struct Fixture {
        orders: Arc<MemoryOrderRepository>,
        audit_repo: Arc<MemoryAuditRepository>,
        uc: UpdateOrderUseCase<MemoryOrderRepository, MemoryCatalogRepository, MemoryAccountRepository>,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(MemoryOrderRepository::new());
        let audit_repo = Arc::new(MemoryAuditRepository::new());
        let uc = UpdateOrderUseCase::new(
            orders.clone(),
            Arc::new(MemoryCatalogRepository::new()),
            Arc::new(MemoryAccountRepository::new()),
            AuditRecorder::new(audit_repo.clone()),
        );
        Fixture {
            orders,
            audit_repo,
            uc,
        }
    }

    async fn placed(orders: &MemoryOrderRepository) -> Order {
        let order = Order::place(
            AccountId::new(),
            vec![OrderLine {
                product_id: ProductId::new(),
                quantity: 2,
                unit_price: Decimal::TEN,
            }],
        );
        orders.create_order(&order).await.unwrap();
        order
    }

    #[tokio::test]
    async fn test_update_persists_and_audits_once() {
        let f = fixture();
        let order = placed(&f.orders).await;
        let actor = staff();

        let view = f
            .uc
            .execute(
                &actor,
                order.id,
                StaffUpdate::new(Some("In preparazione"), Some(" 15 min "), Some(" ok ")).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(view.order.status, OrderStatus::InPreparation);
        assert!(view.products[0].is_none());

        let stored = f.orders.find_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.remaining_time, "15 min");
        assert_eq!(stored.admin_comment, "ok");
        assert_eq!(stored.total_amount, Decimal::from(20));

        let logs = f.audit_repo.settled(1).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].actor_id, actor.id);
        assert_eq!(logs[0].action, actions::UPDATED_ORDER);
        assert_eq!(
            logs[0].details,
            format!("mia updated order {} for user", order.id)
        );
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let f = fixture();
        let err = f
            .uc
            .execute(
                &staff(),
                OrderId::new(),
                StaffUpdate::new(Some("Completato"), None, None).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound));
    }
}
