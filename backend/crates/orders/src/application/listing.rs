//! Order Listing
//!
//! Orders are returned with their products (and, for staff, the buyer)
//! resolved in one batch lookup per collection.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use auth::{Account, AccountRepository};
use catalog::{Product, ProductRepository};
use kernel::id::{AccountId, ProductId};

use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::error::OrderResult;

/// Order with references resolved. `products` is aligned with
/// `order.lines`; an entry is `None` once the product is deleted.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: Order,
    pub products: Vec<Option<Product>>,
    /// Only resolved for staff listings
    pub buyer: Option<Account>,
}

pub(crate) async fn with_products<P>(products: &P, orders: Vec<Order>) -> OrderResult<Vec<OrderView>>
where
    P: ProductRepository,
{
    let ids: Vec<ProductId> = orders
        .iter()
        .flat_map(Order::product_ids)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let found: HashMap<ProductId, Product> = products
        .find_products(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| OrderView {
            products: order.product_ids().map(|id| found.get(&id).cloned()).collect(),
            order,
            buyer: None,
        })
        .collect())
}

pub(crate) async fn with_buyers<A>(accounts: &A, mut views: Vec<OrderView>) -> OrderResult<Vec<OrderView>>
where
    A: AccountRepository,
{
    let ids: Vec<AccountId> = views
        .iter()
        .map(|v| v.order.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let found: HashMap<AccountId, Account> = accounts
        .find_many(&ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    for view in &mut views {
        view.buyer = found.get(&view.order.user_id).cloned();
    }
    Ok(views)
}

pub struct ListOrdersUseCase<O, P, A>
where
    O: OrderRepository,
    P: ProductRepository,
    A: AccountRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
    accounts: Arc<A>,
}

impl<O, P, A> ListOrdersUseCase<O, P, A>
where
    O: OrderRepository,
    P: ProductRepository,
    A: AccountRepository,
{
    pub fn new(orders: Arc<O>, products: Arc<P>, accounts: Arc<A>) -> Self {
        Self {
            orders,
            products,
            accounts,
        }
    }

    /// The caller's own orders, newest first
    pub async fn mine(&self, user_id: AccountId) -> OrderResult<Vec<OrderView>> {
        let orders = self.orders.list_orders_for_user(user_id).await?;
        with_products(self.products.as_ref(), orders).await
    }

    /// Every order with its buyer, newest first
    pub async fn all(&self) -> OrderResult<Vec<OrderView>> {
        let orders = self.orders.list_orders().await?;
        let views = with_products(self.products.as_ref(), orders).await?;
        with_buyers(self.accounts.as_ref(), views).await
    }
}
