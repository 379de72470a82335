//! Router configuration - centralized route definitions
//!
//! Routes are split into public (no session required) and protected
//! (session middleware) groups. Health and metrics must stay public for
//! probes and scraping; register/login/logout are public by nature.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;
use super::{auth, bookmarks, categories, chat, health};

/// Build the public routes (no authentication required)
pub fn build_public_routes(state: AppState) -> Router {
    Router::new()
        // =================================================================
        // HEALTH & METRICS
        // =================================================================
        .route("/health", get(health::health))
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        .route("/metrics", get(health::metrics_endpoint))
        // =================================================================
        // SESSION ENTRY/EXIT
        // =================================================================
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        // Logout revokes whatever cookie is presented; it must not 401
        .route("/api/logout", post(auth::logout))
        .with_state(state)
}

/// Build the protected routes (session required)
///
/// The session middleware is attached by the caller so tests can compose
/// the same router that main.rs serves.
pub fn build_protected_routes(state: AppState) -> Router {
    Router::new()
        // =================================================================
        // ACCOUNT
        // =================================================================
        .route(
            "/api/user",
            get(auth::current_user).delete(auth::delete_account),
        )
        // =================================================================
        // CATEGORIES
        // =================================================================
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/api/categories/{id}", delete(categories::delete_category))
        // =================================================================
        // BOOKMARKS
        // =================================================================
        .route(
            "/api/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route(
            "/api/bookmarks/{id}",
            get(bookmarks::get_bookmark)
                .put(bookmarks::update_bookmark)
                .delete(bookmarks::delete_bookmark),
        )
        // =================================================================
        // CHAT ASSISTANT
        // =================================================================
        .route("/api/chat", post(chat::chat))
        .with_state(state)
}

/// Assemble the full application router with the session guard attached
///
/// Rate limiting, timeouts, CORS, and metrics tracking are layered on top
/// by main.rs; tests drive this router directly.
pub fn build_router(state: AppState) -> Router {
    let public = build_public_routes(state.clone());
    let protected = build_protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(state, crate::auth::require_session),
    );

    Router::new().merge(public).merge(protected)
}
