//! Health and infrastructure handlers
//!
//! Probes and the Prometheus exposition endpoint. All public: monitoring
//! must work without a session.

use axum::{extract::State, http::StatusCode, Json};

use super::state::AppState;
use crate::metrics;

/// Health response for the main health endpoint
#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users: usize,
    pub categories: usize,
    pub bookmarks: usize,
    pub active_sessions: usize,
}

/// Main health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = state.counts();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        users: counts.users,
        categories: counts.categories,
        bookmarks: counts.bookmarks,
        active_sessions: state.sessions().active_count(),
    })
}

/// Liveness probe - 200 whenever the process can answer at all
pub async fn health_live() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Readiness probe - the in-memory store is always ready once running
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "users": state.counts().users,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Prometheus text exposition
pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    use prometheus::Encoder;

    // Refresh gauges before serving
    let counts = state.counts();
    metrics::USERS_TOTAL.set(counts.users as i64);
    metrics::CATEGORIES_TOTAL.set(counts.categories as i64);
    metrics::BOOKMARKS_TOTAL.set(counts.bookmarks as i64);
    metrics::SESSIONS_ACTIVE.set(state.sessions().active_count() as i64);

    let encoder = prometheus::TextEncoder::new();
    let metric_families = metrics::METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
