//! Collaborator service traits and in-memory implementations.

pub mod catalog;
pub mod users;

use thiserror::Error;

pub use catalog::{InMemoryProductCatalog, Product, ProductCatalog, StockCheck};
pub use users::{InMemoryUserDirectory, User, UserDirectory};

/// Error from a collaborator service call.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The referenced entity does not exist on the remote side.
    #[error("{0}")]
    NotFound(String),

    /// The operation would violate a remote invariant (e.g. driving
    /// stock below zero).
    #[error("{0}")]
    FailedPrecondition(String),

    /// The service failed to answer.
    #[error("{0}")]
    Unavailable(String),
}
