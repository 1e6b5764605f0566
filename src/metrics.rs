//! Prometheus metrics for cache behaviour and upstream latency.
//!
//! This module provides metrics for:
//! - Cache hits, refreshes and initial populations
//! - Upstream presence fetch latency and failures

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Upstream presence fetch latency metric name.
pub const METRIC_UPSTREAM_FETCH_LATENCY: &str = "upstream_fetch_latency_ms";
/// Requests answered from a fresh cache record.
pub const METRIC_CACHE_HITS: &str = "status_cache_hits_total";
/// Expired records refreshed from upstream.
pub const METRIC_CACHE_REFRESHES: &str = "status_cache_refreshes_total";
/// Records created because none existed.
pub const METRIC_CACHE_POPULATIONS: &str = "status_cache_populations_total";
/// Failed upstream fetches.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Register metric descriptions with the installed recorder.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_FETCH_LATENCY,
        "Telegram presence fetch latency in milliseconds"
    );

    describe_counter!(
        METRIC_CACHE_HITS,
        "Status requests answered from a fresh cache record"
    );
    describe_counter!(
        METRIC_CACHE_REFRESHES,
        "Expired cache records refreshed from Telegram"
    );
    describe_counter!(
        METRIC_CACHE_POPULATIONS,
        "Cache records created on first request"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Failed Telegram presence fetches"
    );

    debug!("Metrics initialized");
}

/// Increment cache hits counter.
pub fn inc_cache_hits() {
    counter!(METRIC_CACHE_HITS).increment(1);
}

/// Increment cache refreshes counter.
pub fn inc_cache_refreshes() {
    counter!(METRIC_CACHE_REFRESHES).increment(1);
}

/// Increment cache populations counter.
pub fn inc_cache_populations() {
    counter!(METRIC_CACHE_POPULATIONS).increment(1);
}

/// Increment upstream failures counter.
pub fn inc_upstream_failures() {
    counter!(METRIC_UPSTREAM_FAILURES).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for an upstream presence fetch.
pub fn timer_upstream_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_UPSTREAM_FETCH_LATENCY)
}
