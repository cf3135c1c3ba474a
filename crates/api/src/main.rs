//! Server entry point: REST, gRPC and metrics listeners over one PostgreSQL pool.

use std::future::IntoFuture;
use std::sync::Arc;

use api::config::{Config, LogFormat};
use api::observer::PrometheusObserver;
use auth::JwtService;
use store::PostgresStore;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
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

/// Resolves once the shutdown signal has been broadcast.
async fn shutdown_requested(mut rx: watch::Receiver<()>) {
    let _ = rx.changed().await;
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    // 1. Configuration and tracing
    let config = Config::from_env();
    init_tracing(&config);
    if config.uses_default_jwt_secret() {
        tracing::warn!("JWT_SECRET is not set, signing tokens with the development secret");
    }

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect the store and apply migrations
    let store = PostgresStore::connect(&config.database())
        .await
        .expect("failed to connect to PostgreSQL");
    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    // 4. Build the application state
    let state = api::create_state(
        store.clone(),
        JwtService::new(&config.jwt()),
        Arc::new(PrometheusObserver),
    );

    // 5. Bind listeners
    let rest_listener = TcpListener::bind(config.rest_addr())
        .await
        .expect("failed to bind REST address");
    let grpc_listener = TcpListener::bind(config.grpc_addr())
        .await
        .expect("failed to bind gRPC address");
    let metrics_listener = TcpListener::bind(config.metrics_addr())
        .await
        .expect("failed to bind metrics address");
    tracing::info!(
        rest = %config.rest_addr(),
        grpc = %config.grpc_addr(),
        metrics = %config.metrics_addr(),
        "starting servers"
    );

    // 6. Serve until a signal arrives, then drain all three
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    let rest = axum::serve(rest_listener, api::create_app(state.clone()))
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()))
        .into_future();
    let metrics = axum::serve(metrics_listener, api::create_metrics_app(metrics_handle))
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()))
        .into_future();
    let grpc = api::grpc::serve(state, grpc_listener, shutdown_requested(shutdown_rx));

    let (rest, grpc, metrics) = tokio::join!(rest, grpc, metrics);
    if let Err(e) = rest {
        tracing::error!(error = %e, "REST server error");
    }
    if let Err(e) = grpc {
        tracing::error!(error = %e, "gRPC server error");
    }
    if let Err(e) = metrics {
        tracing::error!(error = %e, "metrics server error");
    }

    store.close().await;
    tracing::info!("server shut down gracefully");
}
