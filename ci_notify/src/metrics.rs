//! Notification metrics. The exporter is installed by the host binary; without
//! one these calls are no-ops.

use metrics::{counter, histogram};

use crate::error::ErrorCategory;

/// Record an event accepted for notification.
pub fn event_received(kind: &'static str) {
    counter!("notify_events_total", "event" => kind).increment(1);
}

/// Record an event that produced no message.
pub fn event_skipped(kind: &'static str) {
    counter!("notify_events_skipped_total", "event" => kind).increment(1);
}

/// Record a successful webhook delivery.
pub fn delivery_succeeded(duration_ms: u64) {
    counter!("notify_deliveries_total", "outcome" => "delivered").increment(1);
    histogram!("notify_delivery_duration_ms").record(duration_ms as f64);
}

/// Record a failed webhook delivery.
pub fn delivery_failed(category: ErrorCategory) {
    counter!("notify_deliveries_total", "outcome" => "failed").increment(1);
    counter!("notify_delivery_errors_total", "category" => category.to_string()).increment(1);
}
