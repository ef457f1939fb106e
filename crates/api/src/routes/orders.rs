//! Order placement and unary order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{OrderId, UserId};
use domain::{Money, NewOrderItem, Order, OrderStatus, ProductId};
use order_store::{OrderService, OrderStore};
use saga::{
    InMemoryProductCatalog, InMemoryUserDirectory, OrderLineRequest, PlaceOrderRequest,
    SagaCoordinator,
};
use serde::{Deserialize, Serialize};
use tracking::StatusStreamer;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
    pub saga: SagaCoordinator<S, InMemoryUserDirectory, InMemoryProductCatalog>,
    pub streamer: StatusStreamer<S>,
    pub store: Arc<S>,
    pub users: InMemoryUserDirectory,
    pub catalog: InMemoryProductCatalog,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderBody {
    pub user_email: String,
    pub items: Vec<PlaceOrderItem>,
}

#[derive(Deserialize)]
pub struct PlaceOrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CreateOrderBody {
    pub user_id: uuid::Uuid,
    pub items: Vec<CreateOrderItem>,
}

#[derive(Deserialize)]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub user_id: uuid::Uuid,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
}

fn order_to_response(order: Order) -> OrderResponse {
    let items = order
        .items
        .iter()
        .map(|item| OrderItemResponse {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            price_cents: item.price.cents(),
        })
        .collect();

    OrderResponse {
        id: order.id.to_string(),
        user_id: order.user_id.to_string(),
        status: order.status,
        total_cents: order.total_amount.cents(),
        created_at: order.created_at.to_rfc3339(),
        items,
    }
}

// -- Handlers --

/// POST /orders/place — run the place-order saga for a user and cart.
#[tracing::instrument(skip(state, body), fields(user_email = %body.user_email))]
pub async fn place<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let request = PlaceOrderRequest {
        user_email: body.user_email,
        items: body
            .items
            .into_iter()
            .map(|item| OrderLineRequest {
                product_id: ProductId::new(item.product_id),
                quantity: item.quantity,
            })
            .collect(),
    };

    let order = state.saga.place_order(request).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(order_to_response(order)),
    ))
}

/// POST /orders — create an order directly with caller-supplied prices.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<CreateOrderBody>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let items = body
        .items
        .into_iter()
        .map(|item| NewOrderItem {
            product_id: ProductId::new(item.product_id),
            quantity: item.quantity,
            price: Money::from_cents(item.price_cents),
        })
        .collect();

    let order = state
        .order_service
        .create_order(UserId::from_uuid(body.user_id), items)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(order_to_response(order)),
    ))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .order_service
        .find_order_by_id(OrderId::from_uuid(id))
        .await?;
    Ok(Json(order_to_response(order)))
}

/// GET /orders?user_id=…&page=…&limit=… — page through a user's orders,
/// newest first.
#[tracing::instrument(skip(state, params), fields(user_id = %params.user_id))]
pub async fn list<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let page = state
        .order_service
        .find_orders_by_user(UserId::from_uuid(params.user_id), params.page, params.limit)
        .await?;

    Ok(Json(OrderListResponse {
        orders: page.orders.into_iter().map(order_to_response).collect(),
        total: page.total,
    }))
}

/// POST /orders/:id/status — overwrite an order's status.
#[tracing::instrument(skip(state, body))]
pub async fn update_status<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<uuid::Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown order status: {}", body.status)))?;

    let order = state
        .order_service
        .update_order_status(OrderId::from_uuid(id), status)
        .await?;
    Ok(Json(order_to_response(order)))
}

/// POST /orders/:id/cancel — cancel an order still in `CREATED` status.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .order_service
        .cancel_order(OrderId::from_uuid(id))
        .await?;
    Ok(Json(order_to_response(order)))
}
