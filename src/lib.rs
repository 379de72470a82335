//! Webmark Library
//!
//! Multi-user bookmark manager served over a REST API.
//! Users register with username/password, organize bookmarks into
//! categories, and talk to a local LLM assistant for organization tips.
//!
//! # Key Features
//! - Session-cookie authentication with scrypt-hashed passwords
//! - Per-user data isolation enforced at the route layer
//! - In-memory storage behind a trait seam
//! - Full offline operation (the chat assistant degrades gracefully
//!   when no local LLM server is running)

pub mod assistant;
pub mod auth;
pub mod config;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod storage;
pub mod validation;

// Re-export dependencies to ensure tests use the same version
pub use chrono;
pub use parking_lot;
