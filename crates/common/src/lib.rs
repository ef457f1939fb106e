//! Shared identifier types used across the order platform crates.

mod types;

pub use types::{OrderId, UserId};
