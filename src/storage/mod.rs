//! Storage abstraction for users, categories, and bookmarks
//!
//! [`BookmarkStore`] is the seam between the route layer and the backing
//! store. The only backend today is [`memory::MemoryStore`]; the trait
//! keeps the route layer ignorant of how records are held.
//!
//! Ownership is NOT enforced here - handlers check ownership before
//! calling into the store, so these methods operate on raw record ids.

pub mod memory;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

// =============================================================================
// RECORDS
// =============================================================================

/// A registered account. `password_hash` never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// A user-owned bookmark category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

/// A stored bookmark. `username`/`password` are the caller's saved
/// credentials for the bookmarked site, returned verbatim to their owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub category_id: Option<i64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// INSERT / PATCH SHAPES
// =============================================================================

/// Fields required to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Fields required to create a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub user_id: i64,
}

/// Fields required to create a bookmark
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub category_id: Option<i64>,
    pub user_id: i64,
}

/// Partial bookmark update. Outer `None` = leave unchanged; for nullable
/// fields, `Some(None)` = clear the value.
#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub username: Option<Option<String>>,
    pub password: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
}

/// Aggregate record counts, for health and metrics
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StoreCounts {
    pub users: usize,
    pub categories: usize,
    pub bookmarks: usize,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Backing store for all persistent records
pub trait BookmarkStore: Send + Sync {
    // User methods
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Create a user. Fails only when the username is already taken.
    fn create_user(&self, user: NewUser) -> Result<User>;
    /// Delete a user and everything they own (categories, bookmarks).
    /// Returns whether the user existed.
    fn delete_user(&self, id: i64) -> Result<bool>;

    // Category methods
    fn get_categories(&self, user_id: i64) -> Result<Vec<Category>>;
    fn get_category(&self, id: i64) -> Result<Option<Category>>;
    fn create_category(&self, category: NewCategory) -> Result<Category>;
    fn delete_category(&self, id: i64) -> Result<bool>;

    // Bookmark methods
    fn get_bookmarks(&self, user_id: i64) -> Result<Vec<Bookmark>>;
    fn get_bookmarks_by_category(&self, category_id: i64) -> Result<Vec<Bookmark>>;
    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>>;
    fn create_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark>;
    fn update_bookmark(&self, id: i64, patch: BookmarkPatch) -> Result<Option<Bookmark>>;
    fn delete_bookmark(&self, id: i64) -> Result<bool>;

    // Aggregates
    fn counts(&self) -> Result<StoreCounts>;
}
