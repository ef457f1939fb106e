//! Order persistence for the order service.
//!
//! The [`OrderStore`] trait is the narrow repository interface over the
//! relational order tables; [`InMemoryOrderStore`] backs tests and the
//! demo server, [`PostgresOrderStore`] backs real deployments. The
//! [`OrderService`] on top provides the unary order operations (create,
//! find, list, update status, cancel) with their validation rules.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod service;
pub mod store;

pub use common::{OrderId, UserId};
pub use error::{OrderServiceError, Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use service::{OrderPage, OrderService};
pub use store::OrderStore;
