//! Fixed status progressions shared by the two streaming protocols.

use domain::OrderStatus;
use std::time::Duration;

/// The watch timeline: each entry is emitted after its delay has elapsed,
/// relative to the previous entry.
pub const STATUS_TIMELINE: [(OrderStatus, Duration); 6] = [
    (OrderStatus::Created, Duration::from_millis(0)),
    (OrderStatus::Paid, Duration::from_millis(2000)),
    (OrderStatus::Processing, Duration::from_millis(3000)),
    (OrderStatus::Shipped, Duration::from_millis(3000)),
    (OrderStatus::OutForDelivery, Duration::from_millis(4000)),
    (OrderStatus::Delivered, Duration::from_millis(3000)),
];

/// Statuses the interactive session's auto-advance timer walks through,
/// one per tick, regardless of the order's persisted status.
pub const AUTO_ADVANCE: [OrderStatus; 5] = [
    OrderStatus::Paid,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
];

/// Interval between auto-advance ticks.
pub const AUTO_ADVANCE_PERIOD: Duration = Duration::from_millis(3000);

/// Human-readable message accompanying each status update.
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Created => "Order has been created",
        OrderStatus::Paid => "Payment received",
        OrderStatus::Processing => "Order is being processed",
        OrderStatus::Shipped => "Order has been shipped",
        OrderStatus::OutForDelivery => "Order is out for delivery",
        OrderStatus::Delivered => "Order has been delivered",
        OrderStatus::Cancelled => "Order has been cancelled",
        OrderStatus::Failed => "Order has failed",
    }
}
