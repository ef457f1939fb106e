use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::Order;

use crate::Result;

/// Repository interface over the order tables.
///
/// Orders are created exactly once and never deleted; after creation only
/// the status is mutable (line items are price snapshots). All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order together with its line items.
    ///
    /// The order and its items are written atomically. Returns the stored
    /// order.
    async fn create(&self, order: Order) -> Result<Order>;

    /// Retrieves an order with its line items.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Retrieves a page of a user's orders, newest first, together with
    /// the total number of orders for that user.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Order>, u64)>;

    /// Persists the mutable fields of an existing order (the status).
    ///
    /// Fails with [`StoreError::OrderNotFound`] if the order does not
    /// exist.
    ///
    /// [`StoreError::OrderNotFound`]: crate::StoreError::OrderNotFound
    async fn save(&self, order: &Order) -> Result<()>;
}
