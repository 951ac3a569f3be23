//! Metrics definitions for the pagination engine.
//!
//! This module defines all metrics used by the paginator.
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "pages_served_total",
        "Total number of pages returned, by sort and direction"
    );
    describe_counter!(
        "malformed_cursors_total",
        "Total number of cursors that could not be decoded and were ignored"
    );
    describe_counter!(
        "pagination_rejected_total",
        "Total number of requests rejected by pagination validation"
    );
    describe_histogram!(
        "page_fetch_duration_seconds",
        "Time spent waiting on the thread source for one page in seconds"
    );
}

/// Record a page returned to a caller.
///
/// # Arguments
/// * `sort` - The sort strategy ("newest", "popular", ...)
/// * `direction` - "forward" or "backward"
pub fn record_page_served(sort: &'static str, direction: &'static str) {
    counter!("pages_served_total", "sort" => sort, "direction" => direction).increment(1);
}

/// Record a cursor that was ignored because it could not be decoded.
pub fn record_malformed_cursor(sort: &'static str) {
    counter!("malformed_cursors_total", "sort" => sort).increment(1);
}

/// Record a request rejected before reaching the thread source.
///
/// # Arguments
/// * `reason` - Machine-readable validation reason
pub fn record_pagination_rejected(reason: &'static str) {
    counter!("pagination_rejected_total", "reason" => reason).increment(1);
}

/// Record time spent in the thread source.
pub fn record_page_fetch_duration(duration_secs: f64) {
    histogram!("page_fetch_duration_seconds").record(duration_secs);
}

/// A timer that automatically records fetch duration when dropped.
pub struct FetchTimer {
    start: Instant,
}

impl FetchTimer {
    /// Start a new fetch timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for FetchTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FetchTimer {
    fn drop(&mut self) {
        record_page_fetch_duration(self.start.elapsed().as_secs_f64());
    }
}
