//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the wavswap server:
//! - HTTP request metrics (latency, counts, errors)
//! - Storage area occupancy and engine availability (collected dynamically)
//! - Core conversion and janitor metrics

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use wavswap_core::StorageArea;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "wavswap_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wavswap_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "wavswap_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Dynamic Metrics
// =============================================================================

/// Files currently held per storage area (collected dynamically).
pub static STORED_FILES: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("wavswap_stored_files", "Files currently held by storage area"),
        &["area"],
    )
    .unwrap()
});

/// Whether the conversion engine is runnable (collected dynamically).
pub static FFMPEG_AVAILABLE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "wavswap_ffmpeg_available",
        "Whether the conversion engine can be run (1 = yes)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Dynamic
    registry.register(Box::new(STORED_FILES.clone())).unwrap();
    registry
        .register(Box::new(FFMPEG_AVAILABLE.clone()))
        .unwrap();

    // Core metrics (conversions, janitor)
    for metric in wavswap_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the storage areas and the
/// engine as they are right now.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let service = state.service();

    FFMPEG_AVAILABLE.set(if service.is_available().await { 1 } else { 0 });

    for area in StorageArea::ALL {
        if let Ok(entries) = service.store().list(area).await {
            STORED_FILES
                .with_label_values(&[area.as_str()])
                .set(entries.len() as i64);
        }
    }
}

/// Normalize a path for metric labels.
///
/// Download and static paths carry per-file names, so they collapse to a
/// placeholder to keep label cardinality bounded.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with("/download/") {
        return "/download/{file}".to_string();
    }
    if path.starts_with("/static/") {
        return "/static/{file}".to_string();
    }
    path.to_string()
}
