//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Conversions (results, durations)
//! - Storage janitor (sweeps, removals, failures)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Conversion Metrics
// =============================================================================

/// Conversions total by direction and result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wavswap_conversions_total", "Total conversion requests"),
        &["direction", "result"], // result: "success" or an error kind
    )
    .unwrap()
});

/// Conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "wavswap_conversion_duration_seconds",
            "Duration of the external conversion step",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["direction"],
    )
    .unwrap()
});

/// Bytes accepted in uploads.
pub static UPLOAD_BYTES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("wavswap_upload_bytes_total", "Total bytes of stored uploads").unwrap()
});

/// Best-effort rollback deletions that failed.
pub static ROLLBACK_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "wavswap_rollback_failures_total",
        "Incoming assets that could not be removed after a failed conversion",
    )
    .unwrap()
});

// =============================================================================
// Janitor Metrics
// =============================================================================

/// Sweeps performed.
pub static JANITOR_SWEEPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("wavswap_janitor_sweeps_total", "Total storage sweeps").unwrap()
});

/// Files removed by the janitor, by area.
pub static JANITOR_FILES_REMOVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wavswap_janitor_files_removed_total",
            "Expired files removed by the janitor",
        ),
        &["area"],
    )
    .unwrap()
});

/// Janitor removal failures, by area.
pub static JANITOR_REMOVAL_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wavswap_janitor_removal_failures_total",
            "Expired files the janitor failed to remove",
        ),
        &["area"],
    )
    .unwrap()
});

/// All core metrics, for registration in a server registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Conversions
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(UPLOAD_BYTES_TOTAL.clone()),
        Box::new(ROLLBACK_FAILURES_TOTAL.clone()),
        // Janitor
        Box::new(JANITOR_SWEEPS_TOTAL.clone()),
        Box::new(JANITOR_FILES_REMOVED.clone()),
        Box::new(JANITOR_REMOVAL_FAILURES.clone()),
    ]
}
