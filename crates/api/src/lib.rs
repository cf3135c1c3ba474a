//! REST and gRPC transport for the pickup-point service.
//!
//! Provides the REST router, the gRPC listing service and the metrics
//! endpoint, with structured logging (tracing) and Prometheus counters.

pub mod config;
pub mod error;
pub mod extract;
pub mod grpc;
pub mod observer;
pub mod routes;
pub mod state;

use std::sync::Arc;

use auth::JwtService;
use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use observer::OperationObserver;
use state::AppState;

/// Creates the REST router with all routes and shared state.
pub fn create_app<S: Store>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/dummyLogin", post(routes::auth::dummy_login::<S>))
        .route("/register", post(routes::auth::register::<S>))
        .route("/login", post(routes::auth::login::<S>))
        .route(
            "/pvz",
            post(routes::pvz::create::<S>).get(routes::pvz::list::<S>),
        )
        .route(
            "/pvz/{pvzId}/close_last_reception",
            post(routes::receptions::close_last::<S>),
        )
        .route(
            "/pvz/{pvzId}/delete_last_product",
            post(routes::products::delete_last::<S>),
        )
        .route("/receptions", post(routes::receptions::open::<S>))
        .route("/products", post(routes::products::add::<S>))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the router served on the metrics listener.
pub fn create_metrics_app(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(handle)
}

/// Creates the application state over a store backend.
pub fn create_state<S: Store>(
    store: S,
    jwt: JwtService,
    observer: Arc<dyn OperationObserver>,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store, jwt, observer))
}
