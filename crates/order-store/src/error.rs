use common::OrderId;
use domain::OrderError;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back to a domain value.
    #[error("Corrupt order row: {0}")]
    CorruptRow(String),
}

/// Errors surfaced by the unary order operations.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// The request failed domain validation (bad quantity/price, empty
    /// items, illegal cancel transition).
    #[error(transparent)]
    Validation(#[from] OrderError),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
