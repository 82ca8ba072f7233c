//! Metrics collection.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): invocations by event variant, status
//! - `dispatch_duration_seconds` (histogram): pipeline latency
//! - `dispatch_bootstrap_errors_total` (counter): events rejected before a request existed
//!
//! # Design Decisions
//! - Facade calls only; a no-op when the host installs no recorder
//! - Labels limited to variant and status code to bound cardinality

use std::time::Instant;

pub fn record_dispatch(variant: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "variant" => variant,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("dispatch_duration_seconds", "variant" => variant)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_bootstrap_error(status: u16) {
    metrics::counter!("dispatch_bootstrap_errors_total", "status" => status.to_string())
        .increment(1);
}
