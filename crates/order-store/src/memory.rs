use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::Order;
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::OrderStore};

/// In-memory order store for tests and the demo server.
///
/// Provides the same interface and semantics as the PostgreSQL
/// implementation, including newest-first ordering for user listings.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Order>, u64)> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn save(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(stored) => {
                stored.status = order.status;
                Ok(())
            }
            None => Err(StoreError::OrderNotFound(order.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, NewOrderItem, OrderStatus, ProductId};

    fn make_order(user_id: UserId) -> Order {
        Order::place(
            user_id,
            vec![NewOrderItem {
                product_id: ProductId::new("SKU-001"),
                quantity: 2,
                price: Money::from_cents(1000),
            }],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryOrderStore::new();
        let order = make_order(UserId::new());
        let id = order.id;

        store.create(order).await.unwrap();

        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.total_amount, Money::from_cents(2000));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_id(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_pages_newest_first() {
        let store = InMemoryOrderStore::new();
        let user_id = UserId::new();

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut order = make_order(user_id);
            // Distinct timestamps so the ordering is deterministic.
            order.created_at += chrono::Duration::milliseconds(ids.len() as i64);
            ids.push(order.id);
            store.create(order).await.unwrap();
        }
        store.create(make_order(UserId::new())).await.unwrap();

        let (page, total) = store.find_by_user_id(user_id, 0, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, ids[2]);
        assert_eq!(page[1].id, ids[1]);

        let (rest, _) = store.find_by_user_id(user_id, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_save_updates_status() {
        let store = InMemoryOrderStore::new();
        let mut order = make_order(UserId::new());
        store.create(order.clone()).await.unwrap();

        order.set_status(OrderStatus::Cancelled);
        store.save(&order).await.unwrap();

        let found = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(found.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_save_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let order = make_order(UserId::new());
        let result = store.save(&order).await;
        assert!(matches!(result, Err(StoreError::OrderNotFound(_))));
    }
}
