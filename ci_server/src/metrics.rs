//! Prometheus metrics for the notifier host.

use metrics::counter;

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record an event accepted over HTTP.
pub fn event_ingested(kind: &'static str) {
    counter!("notify_events_ingested_total", "event" => kind).increment(1);
}
