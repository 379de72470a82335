//! HTTP API handlers - modular organization of the REST API
//!
//! Each submodule handles a specific domain of functionality.

// Core modules
pub mod router;
pub mod state;
pub mod types;

// Health and infrastructure
pub mod health;

// Account and session
pub mod auth;

// Bookmark domain
pub mod bookmarks;
pub mod categories;

// Assistant
pub mod chat;

// Re-export commonly used items
pub use router::{build_protected_routes, build_public_routes, build_router};
pub use state::{AppState, BookmarkManager};
pub use types::*;
