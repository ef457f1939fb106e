//! Order-placement saga for the order service.
//!
//! This crate provides the multi-service "place order" workflow with
//! compensating actions on failure:
//! 1. Resolve the user by email
//! 2. Fetch product details and check stock for every line item in parallel
//! 3. Validate availability only after all fetches complete
//! 4. Price the order from the fetched product prices
//! 5. Reserve stock sequentially, rolling back reserved items if any
//!    reservation fails
//! 6. Persist the order
//!
//! The user and product services are reached through the [`UserDirectory`]
//! and [`ProductCatalog`] traits; in-memory implementations with failure
//! injection back the tests and the demo server.

pub mod coordinator;
pub mod error;
pub mod services;

pub use coordinator::{OrderLineRequest, PlaceOrderRequest, SagaCoordinator, StockReservation};
pub use error::SagaError;
pub use services::{
    InMemoryProductCatalog, InMemoryUserDirectory, Product, ProductCatalog, ServiceError,
    StockCheck, User, UserDirectory,
};
