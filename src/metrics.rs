//! Prometheus metrics
//!
//! Exposes key operational metrics for monitoring and alerting:
//! - Request rates and latencies
//! - Account / session / record gauges
//! - Chat assistant outcomes
//!
//! NOTE: No user ids in metric labels - per-user labels would explode
//! cardinality.

use lazy_static::lazy_static;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
};

lazy_static! {
    /// Global metrics registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Request Metrics
    // ============================================================================

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "webmark_http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["method", "endpoint", "status"]
    ).unwrap();

    /// Total HTTP requests
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("webmark_http_requests_total", "Total HTTP requests"),
        &["method", "endpoint", "status"]
    ).unwrap();

    // ============================================================================
    // Auth Metrics
    // ============================================================================

    /// Login/register attempts by outcome
    pub static ref AUTH_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("webmark_auth_attempts_total", "Authentication attempts"),
        &["operation", "result"]  // operation: "login"/"register", result: "ok"/"rejected"
    ).unwrap();

    /// Unexpired sessions currently held
    pub static ref SESSIONS_ACTIVE: IntGauge = IntGauge::new(
        "webmark_sessions_active",
        "Number of unexpired sessions"
    ).unwrap();

    // ============================================================================
    // Record Gauges (aggregate)
    // ============================================================================

    /// Registered accounts
    pub static ref USERS_TOTAL: IntGauge = IntGauge::new(
        "webmark_users_total",
        "Number of registered users"
    ).unwrap();

    /// Stored categories across all users
    pub static ref CATEGORIES_TOTAL: IntGauge = IntGauge::new(
        "webmark_categories_total",
        "Number of stored categories"
    ).unwrap();

    /// Stored bookmarks across all users
    pub static ref BOOKMARKS_TOTAL: IntGauge = IntGauge::new(
        "webmark_bookmarks_total",
        "Number of stored bookmarks"
    ).unwrap();

    // ============================================================================
    // Chat Assistant Metrics
    // ============================================================================

    /// Chat requests by backend outcome
    pub static ref CHAT_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("webmark_chat_requests_total", "Chat assistant requests"),
        &["result"]  // result: "ok"/"fallback"
    ).unwrap();

    /// Chat request duration (includes LLM generation time)
    pub static ref CHAT_REQUEST_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "webmark_chat_request_duration_seconds",
            "Chat assistant request duration"
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    ).unwrap();
}

/// Register all metrics with the global registry
pub fn register_metrics() -> Result<(), prometheus::Error> {
    // Request metrics
    METRICS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    METRICS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;

    // Auth metrics
    METRICS_REGISTRY.register(Box::new(AUTH_ATTEMPTS_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(SESSIONS_ACTIVE.clone()))?;

    // Record gauges
    METRICS_REGISTRY.register(Box::new(USERS_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(CATEGORIES_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(BOOKMARKS_TOTAL.clone()))?;

    // Chat metrics
    METRICS_REGISTRY.register(Box::new(CHAT_REQUESTS_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(CHAT_REQUEST_DURATION.clone()))?;

    Ok(())
}
