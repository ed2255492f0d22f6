use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Orbit metrics
const PREFIX: &str = "orbit";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upstream (Spotify Web API) Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_requests_total"), "Requests made to the music provider"),
        &["endpoint", "outcome"]
    ).expect("Failed to create upstream_requests_total metric");

    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_upstream_request_duration_seconds"),
            "Music provider request duration in seconds"
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["endpoint"]
    ).expect("Failed to create upstream_request_duration_seconds metric");

    // Cache Metrics
    pub static ref CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_cache_lookups_total"), "Consolidated cache lookups"),
        &["result"]
    ).expect("Failed to create cache_lookups_total metric");

    pub static ref CACHE_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_cache_entries"),
        "Number of consolidated snapshots currently cached"
    ).expect("Failed to create cache_entries metric");

    // Pipeline Metrics
    pub static ref THEMES_SYNTHESIZED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_themes_synthesized_total"), "Themes produced, by theme name"),
        &["theme"]
    ).expect("Failed to create themes_synthesized_total metric");

    pub static ref MAIL_MESSAGES_SUMMARIZED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_mail_messages_summarized_total"), "Mail messages aggregated"),
        &["redacted"]
    ).expect("Failed to create mail_messages_summarized_total metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Error responses by type and status"),
        &["error_type", "status"]
    ).expect("Failed to create errors_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_ENTRIES.clone()));
    let _ = REGISTRY.register(Box::new(THEMES_SYNTHESIZED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(MAIL_MESSAGES_SUMMARIZED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a call to the music provider. `outcome` is `ok` or an error kind.
pub fn record_upstream_request(endpoint: &str, outcome: &str, duration: Duration) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[endpoint, outcome])
        .inc();

    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(duration.as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    CACHE_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

pub fn set_cache_entries(count: usize) {
    CACHE_ENTRIES.set(count as f64);
}

pub fn record_theme_synthesized(theme: &str) {
    THEMES_SYNTHESIZED_TOTAL.with_label_values(&[theme]).inc();
}

pub fn record_mail_messages(total: usize, redacted: usize) {
    MAIL_MESSAGES_SUMMARIZED_TOTAL
        .with_label_values(&["true"])
        .inc_by(redacted as f64);
    MAIL_MESSAGES_SUMMARIZED_TOTAL
        .with_label_values(&["false"])
        .inc_by(total.saturating_sub(redacted) as f64);
}

/// Record an error response
pub fn record_error(error_type: &str, status: u16) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, &status.to_string()])
        .inc();
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
