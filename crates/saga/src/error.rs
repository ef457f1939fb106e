//! Saga error types.

use domain::ProductId;
use order_store::OrderServiceError;
use thiserror::Error;

use crate::services::ServiceError;

/// Errors that can occur during order placement.
#[derive(Debug, Error)]
pub enum SagaError {
    /// No user registered under the given email.
    #[error("User with email {0} not found")]
    UserNotFound(String),

    /// A line item referenced a product that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product exists but cannot cover the requested quantity.
    #[error(
        "Insufficient stock for product {name}. Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        name: String,
        available: u32,
        requested: u32,
    },

    /// A stock reservation failed mid-sequence. Reserved items were
    /// rolled back on a best-effort basis; this carries the original
    /// reservation error.
    #[error("Stock reservation failed: {reason}")]
    ReservationFailed { reason: String },

    /// The user service failed to answer.
    #[error("User service error: {0}")]
    UserService(ServiceError),

    /// The product service failed to answer.
    #[error("Product service error: {0}")]
    ProductService(ServiceError),

    /// Order persistence failed.
    #[error(transparent)]
    Order(#[from] OrderServiceError),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
