//! Domain model for the order service.
//!
//! Orders are plain records owned by the order service: a user, a status,
//! a set of immutable line items, and a total amount computed from the
//! items at creation time. All mutation goes through validated methods so
//! the total-amount invariant cannot be broken after construction.

mod order;
mod status;
mod value_objects;

pub use order::{NewOrderItem, Order, OrderError, OrderItem};
pub use status::{OrderStatus, UnknownStatus};
pub use value_objects::{Money, ProductId};
