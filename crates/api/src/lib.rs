//! HTTP host for the checkout fan-out pipeline.
//!
//! Exposes the checkout endpoint plus seeding routes for the in-memory
//! basket and catalog stores, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use broker::ChannelBroker;
use domain::UriComposer;
use fulfillment::{DeliveryIntake, OrderCoordinator};
use metrics_exporter_prometheus::PrometheusHandle;
use stores::{InMemoryBasketStore, InMemoryCatalogStore, InMemoryOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
use routes::checkout::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<D: DeliveryIntake + 'static>(
    state: Arc<AppState<D>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", post(routes::checkout::create::<D>))
        .route("/baskets", post(routes::baskets::create::<D>))
        .route("/catalog-items", post(routes::catalog::create::<D>))
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

/// Creates the application state: in-memory stores wired to a coordinator
/// publishing on the given broker channel.
pub fn create_state<D: DeliveryIntake>(
    broker: &ChannelBroker,
    channel: &str,
    delivery: D,
    picture_base_url: &str,
) -> Arc<AppState<D>> {
    let baskets = InMemoryBasketStore::new();
    let catalog = InMemoryCatalogStore::new();
    let orders = InMemoryOrderStore::new();

    let coordinator = OrderCoordinator::new(
        baskets.clone(),
        catalog.clone(),
        orders.clone(),
        broker.sender(channel),
        delivery,
        UriComposer::new(picture_base_url),
    );

    Arc::new(AppState {
        coordinator,
        baskets,
        catalog,
        orders,
    })
}
