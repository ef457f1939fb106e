//! HTTP API server with observability for the order service.
//!
//! Provides REST endpoints for order management and the place-order saga,
//! an SSE endpoint for the status watch stream, and a WebSocket endpoint
//! for interactive order tracking, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders/place", post(routes::orders::place::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/status", post(routes::orders::update_status::<S>))
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<S>))
        .route(
            "/orders/{id}/status/stream",
            get(routes::tracking::watch::<S>),
        )
        .route("/orders/track", get(routes::tracking::track::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory user and product
/// collaborators over the given store.
pub fn create_default_state<S: OrderStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    use order_store::OrderService;
    use saga::{InMemoryProductCatalog, InMemoryUserDirectory, SagaCoordinator};
    use tracking::StatusStreamer;

    let users = InMemoryUserDirectory::new();
    let catalog = InMemoryProductCatalog::new();
    let store = Arc::new(store);

    Arc::new(AppState {
        order_service: OrderService::new((*store).clone()),
        saga: SagaCoordinator::new((*store).clone(), users.clone(), catalog.clone()),
        streamer: StatusStreamer::new(store.clone()),
        store,
        users,
        catalog,
    })
}
