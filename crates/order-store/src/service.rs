//! Unary order operations over an [`OrderStore`].

use common::{OrderId, UserId};
use domain::{NewOrderItem, Order, OrderStatus};
use serde::Serialize;

use crate::{OrderServiceError, StoreError, store::OrderStore};

/// Default page number when the caller passes 0.
const DEFAULT_PAGE: u64 = 1;
/// Default page size when the caller passes 0.
const DEFAULT_LIMIT: u64 = 10;

/// One page of a user's orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
}

/// Service for the unary order operations.
///
/// This is the low-level persistence surface: callers of
/// [`create_order`](OrderService::create_order) supply their own price
/// snapshots and get `Validation` errors if any are missing or
/// non-positive. The saga is the only caller that derives prices from the
/// product catalog first.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates and persists an order in `Created` status.
    ///
    /// Validates the line items (non-empty, quantity > 0, price > 0) and
    /// computes the total from the supplied price snapshots. Returns the
    /// fully hydrated order with generated ids and timestamp.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: Vec<NewOrderItem>,
    ) -> Result<Order, OrderServiceError> {
        let order = Order::place(user_id, items)?;
        let order = self.store.create(order).await?;
        tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");
        Ok(order)
    }

    /// Retrieves an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn find_order_by_id(&self, id: OrderId) -> Result<Order, OrderServiceError> {
        let order = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound(id))?;
        Ok(order)
    }

    /// Retrieves a page of a user's orders, newest first.
    ///
    /// `page` is 1-based; zero values fall back to page 1 / limit 10,
    /// matching the upstream gateway defaults.
    #[tracing::instrument(skip(self))]
    pub async fn find_orders_by_user(
        &self,
        user_id: UserId,
        page: u64,
        limit: u64,
    ) -> Result<OrderPage, OrderServiceError> {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let offset = (page - 1) * limit;

        let (orders, total) = self.store.find_by_user_id(user_id, offset, limit).await?;
        Ok(OrderPage { orders, total })
    }

    /// Overwrites an order's status unconditionally.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderServiceError> {
        let mut order = self.find_order_by_id(id).await?;
        order.set_status(status);
        self.store.save(&order).await?;
        tracing::info!(order_id = %id, %status, "order status updated");
        Ok(order)
    }

    /// Cancels an order that is still in `Created` status.
    ///
    /// The resulting status is `Failed`. Any other current status is a
    /// precondition failure.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, OrderServiceError> {
        let mut order = self.find_order_by_id(id).await?;
        order.cancel()?;
        self.store.save(&order).await?;
        tracing::info!(order_id = %id, "order cancelled");
        Ok(order)
    }
}
