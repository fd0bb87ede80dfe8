//! Checkout pipeline host entry point.

use broker::ChannelBroker;
use fulfillment::{HttpDeliveryIntake, HttpEscalationNotifier, ReservationWorker, worker};
use stores::InMemoryWarehouseStore;
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

    let config = api::Config::from_env();

    // 3. Wire the broker and spawn the reservation worker
    let broker = ChannelBroker::new();
    let subscription = broker
        .subscribe(&config.reservations_channel)
        .expect("reservations channel already subscribed");

    let warehouse = InMemoryWarehouseStore::new();
    let escalation = HttpEscalationNotifier::new(&config.escalation_url)
        .expect("failed to build escalation client");
    tokio::spawn(worker::run(
        subscription,
        ReservationWorker::new(warehouse, escalation),
    ));

    // 4. Build the coordinator state and application
    let delivery = HttpDeliveryIntake::new(&config.delivery_intake_url)
        .expect("failed to build delivery intake client");
    let state = api::create_state(
        &broker,
        &config.reservations_channel,
        delivery,
        &config.picture_base_url,
    );
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting checkout host");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
