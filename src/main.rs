//! Webmark - multi-user bookmark manager
//!
//! Standalone REST server: session-cookie auth, per-user bookmark and
//! category storage, and a chat assistant backed by a local LLM server.

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webmark::auth;
use webmark::config::ServerConfig;
use webmark::handlers::{build_protected_routes, build_public_routes, BookmarkManager};
use webmark::metrics;
use webmark::middleware;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    metrics::register_metrics().expect("Failed to register metrics");
    info!("📊 Metrics registered at /metrics");

    info!("🔖 Starting Webmark server...");

    // Load configuration from environment
    let config = ServerConfig::from_env();
    config.log();

    let manager = Arc::new(BookmarkManager::new(config.clone()));

    // Periodic sweep of expired sessions
    let sweeper = Arc::clone(&manager);
    let sweep_interval = config.session_sweep_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval.max(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let swept = sweeper.sessions().sweep_expired();
            if swept > 0 {
                info!("Session sweep removed {} expired session(s)", swept);
            }
        }
    });

    // Protected API routes - require a session cookie
    let protected = build_protected_routes(manager.clone()).layer(
        axum::middleware::from_fn_with_state(manager.clone(), auth::require_session),
    );

    // Rate limiting applies to the protected API only; probes and metrics
    // must always be reachable
    let protected = if config.rate_limit_per_second > 0 {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to build governor rate limiter configuration");

        info!(
            "⚡ Rate limiting enabled: {} req/sec, burst of {}",
            config.rate_limit_per_second, config.rate_limit_burst
        );

        protected.layer(GovernorLayer::new(governor_conf))
    } else {
        protected
    };

    let public = build_public_routes(manager.clone());

    // Global layers: metrics tracking, timeout, concurrency cap, CORS
    let app = Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
        .layer(config.cors.to_layer());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {e}"))?;
    info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // In-memory state dies with the process; nothing to flush
    info!("👋 Shutdown complete (in-memory state discarded)");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received, starting graceful shutdown");
}
