//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use order_store::{OrderServiceError, StoreError};
use saga::{SagaError, ServiceError};
use tracking::TrackingError;

/// API-level error type that maps to HTTP responses.
///
/// The four buckets mirror the upstream gateway's status taxonomy:
/// bad request, not found, failed precondition (409) and internal.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Order validation or persistence error.
    Order(OrderServiceError),
    /// Place-order saga error.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Order(err) => order_error_to_response(err),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn order_error_to_response(err: OrderServiceError) -> (StatusCode, String) {
    match &err {
        OrderServiceError::Validation(order_err) => match order_err {
            OrderError::CannotCancel { .. } => (StatusCode::CONFLICT, err.to_string()),
            OrderError::NoItems
            | OrderError::InvalidQuantity { .. }
            | OrderError::InvalidPrice { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        OrderServiceError::Store(StoreError::OrderNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        OrderServiceError::Store(_) => {
            tracing::error!(error = %err, "order store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn saga_error_to_response(err: SagaError) -> (StatusCode, String) {
    let message = err.to_string();
    match err {
        SagaError::UserNotFound(_) | SagaError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, message)
        }
        SagaError::InsufficientStock { .. } | SagaError::ReservationFailed { .. } => {
            (StatusCode::CONFLICT, message)
        }
        SagaError::UserService(inner) | SagaError::ProductService(inner) => match inner {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, message),
            ServiceError::FailedPrecondition(_) => (StatusCode::CONFLICT, message),
            ServiceError::Unavailable(_) => {
                tracing::error!(error = %message, "upstream service failure");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        },
        SagaError::Order(inner) => order_error_to_response(inner),
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        ApiError::Order(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::OrderNotFound(id) => ApiError::NotFound(format!("Order {id} not found")),
            TrackingError::Store(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}
