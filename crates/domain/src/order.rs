//! Order record and line items.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{Money, OrderStatus, ProductId};

/// Errors that can occur when constructing or mutating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order has no items.
    #[error("Order must contain at least one item")]
    NoItems,

    /// Item quantity is zero.
    #[error("Invalid quantity for product {product_id}: must be greater than 0")]
    InvalidQuantity { product_id: ProductId },

    /// Item price is missing or non-positive.
    #[error("Invalid price for product {product_id}: must be greater than 0")]
    InvalidPrice { product_id: ProductId },

    /// Cancel requested on an order that has moved past `Created`.
    #[error("Cannot cancel order with status {status}")]
    CannotCancel { status: OrderStatus },
}

/// Input line item for order creation: the caller supplies the price
/// snapshot (the saga fetches it from the product catalog, direct callers
/// of the creation primitive must provide it themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

/// A line item on a persisted order. Immutable once the order exists:
/// the price is a snapshot taken at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

impl OrderItem {
    /// Returns the line total (price × quantity).
    pub fn subtotal(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// An order owned by the order service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new order in `Created` status from validated line items.
    ///
    /// Validates every item (quantity > 0, price > 0, at least one item)
    /// and computes the total from the item price snapshots, never from
    /// any caller-supplied total.
    pub fn place(user_id: UserId, items: Vec<NewOrderItem>) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                });
            }
            if !item.price.is_positive() {
                return Err(OrderError::InvalidPrice {
                    product_id: item.product_id.clone(),
                });
            }
        }

        let order_id = OrderId::new();
        let order_items: Vec<OrderItem> = items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        let total_amount = order_items.iter().map(OrderItem::subtotal).sum();

        Ok(Order {
            id: order_id,
            user_id,
            status: OrderStatus::Created,
            total_amount,
            items: order_items,
            created_at: Utc::now(),
        })
    }

    /// Cancels the order through the unary primitive.
    ///
    /// Only allowed while the order is still `Created`; the resulting
    /// status is `Failed`, mirroring the upstream service behavior.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_cancel() {
            return Err(OrderError::CannotCancel {
                status: self.status,
            });
        }
        self.status = OrderStatus::Failed;
        Ok(())
    }

    /// Overwrites the status. No transition guard: the status update
    /// primitive and the streaming cancel are both unconditional.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}
