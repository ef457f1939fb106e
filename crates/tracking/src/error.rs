use common::OrderId;
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur when opening a tracking stream.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The order to watch does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
