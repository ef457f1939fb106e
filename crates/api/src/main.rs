//! API server entry point.

use api::config::Config;
use api::routes::orders::AppState;
use domain::Money;
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Seeds a demo user and a few products so the place-order saga is
/// usable out of the box.
fn seed_demo_data<S: OrderStore>(state: &AppState<S>) {
    let user = state.users.insert("Demo User", "demo@example.com");
    state
        .catalog
        .insert("laptop-1", "Laptop", Money::from_cents(99_900), 10);
    state
        .catalog
        .insert("phone-1", "Phone", Money::from_cents(59_900), 25);
    state
        .catalog
        .insert("headset-1", "Headset", Money::from_cents(9_900), 50);
    tracing::info!(user_id = %user.id, email = %user.email, "seeded demo data");
}

async fn serve<S: OrderStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    config: &Config,
) {
    seed_demo_data(&state);
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the store and run
    let config = Config::from_env();
    match config.database_url.clone() {
        Some(url) => {
            let store = PostgresOrderStore::connect(&url)
                .await
                .expect("failed to connect to database");
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using Postgres order store");
            serve(api::create_default_state(store), metrics_handle, &config).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory order store");
            let store = InMemoryOrderStore::new();
            serve(api::create_default_state(store), metrics_handle, &config).await;
        }
    }
}
