//! Operation counters.
//!
//! Handlers report successful core operations to an [`OperationObserver`]
//! held in the application state. The production observer increments
//! Prometheus counters through the `metrics` facade.

/// Receives a notification after each successful state-changing operation.
pub trait OperationObserver: Send + Sync {
    fn pvz_created(&self);
    fn reception_created(&self);
    fn product_added(&self);
}

/// Counts operations with the globally installed `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusObserver;

impl OperationObserver for PrometheusObserver {
    fn pvz_created(&self) {
        metrics::counter!("pvz_created_total").increment(1);
    }

    fn reception_created(&self) {
        metrics::counter!("receptions_created_total").increment(1);
    }

    fn product_added(&self) {
        metrics::counter!("products_added_total").increment(1);
    }
}
