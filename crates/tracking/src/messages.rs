//! Wire messages for the two streaming protocols.

use chrono::{DateTime, Utc};
use common::OrderId;
use domain::OrderStatus;
use serde::{Deserialize, Serialize};

/// Inbound query types for the interactive tracking protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    Subscribe,
    GetLocation,
    GetEta,
    GetStatus,
    CancelOrder,
}

/// Outbound response types for the interactive tracking protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseKind {
    StatusUpdate,
    Location,
    Eta,
    Confirmation,
    Error,
}

/// A query sent by a tracking client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingQuery {
    pub order_id: OrderId,
    #[serde(rename = "type")]
    pub kind: QueryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A response emitted to a tracking client.
///
/// `order_id` is absent only on protocol-level errors, where the
/// offending frame never yielded an order id to echo back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TrackingResponse {
    fn base(order_id: Option<OrderId>, kind: ResponseKind, message: impl Into<String>) -> Self {
        Self {
            order_id,
            kind,
            status: None,
            message: message.into(),
            location: None,
            eta: None,
            timestamp: Utc::now(),
        }
    }

    /// A STATUS_UPDATE carrying the given status.
    pub fn status_update(
        order_id: OrderId,
        status: OrderStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Some(status),
            ..Self::base(Some(order_id), ResponseKind::StatusUpdate, message)
        }
    }

    /// A CONFIRMATION carrying the order's current status.
    pub fn confirmation(
        order_id: OrderId,
        status: OrderStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Some(status),
            ..Self::base(Some(order_id), ResponseKind::Confirmation, message)
        }
    }

    /// An in-band ERROR for a specific order; does not terminate the session.
    pub fn error(order_id: OrderId, message: impl Into<String>) -> Self {
        Self::base(Some(order_id), ResponseKind::Error, message)
    }

    /// An in-band ERROR for a frame that could not be decoded at all, so
    /// there is no order id to echo back.
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::base(None, ResponseKind::Error, message)
    }

    /// A stub LOCATION response; the protocol reserves the type but this
    /// core defines no location data source.
    pub fn location_stub(order_id: OrderId) -> Self {
        Self::base(
            Some(order_id),
            ResponseKind::Location,
            "Location tracking is not available for this order",
        )
    }

    /// A stub ETA response; see [`TrackingResponse::location_stub`].
    pub fn eta_stub(order_id: OrderId) -> Self {
        Self::base(
            Some(order_id),
            ResponseKind::Eta,
            "ETA is not available for this order",
        )
    }
}

/// One event of the server-streaming status watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wire_format() {
        let json = r#"{"order_id":"7f2c3a04-6f6a-4edb-97a1-0e4b53f0c67e","type":"SUBSCRIBE"}"#;
        let query: TrackingQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.kind, QueryKind::Subscribe);
        assert!(query.message.is_none());
    }

    #[test]
    fn test_response_wire_format_omits_empty_fields() {
        let response = TrackingResponse::status_update(
            OrderId::new(),
            OrderStatus::OutForDelivery,
            "Order is out for delivery",
        );
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["type"], "STATUS_UPDATE");
        assert_eq!(value["status"], "OUT_FOR_DELIVERY");
        assert!(value.get("location").is_none());
        assert!(value.get("eta").is_none());
    }

    #[test]
    fn test_error_response_has_no_status() {
        let order_id = OrderId::new();
        let response = TrackingResponse::error(order_id, "Order not found");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "ERROR");
        assert_eq!(value["order_id"], order_id.to_string());
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_protocol_error_omits_order_id() {
        let response = TrackingResponse::protocol_error("Malformed tracking query");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "ERROR");
        assert!(value.get("order_id").is_none());
        assert!(value.get("status").is_none());
    }
}
