//! Shared request/response types for the REST API
//!
//! Wire names are camelCase to match the original web client.

use serde::{Deserialize, Deserializer, Serialize};

use crate::assistant::ChatMessage;

/// Distinguish "field absent" from "field explicitly null" in PUT bodies.
/// Absent -> `None` (via `#[serde(default)]`), null -> `Some(None)`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// =============================================================================
// AUTH
// =============================================================================

/// Body for POST /api/register and POST /api/login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an account (never includes the password hash)
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Response for account deletion
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Body for POST /api/categories
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// BOOKMARKS
// =============================================================================

/// Query parameters for GET /api/bookmarks
#[derive(Debug, Deserialize)]
pub struct ListBookmarksQuery {
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
}

/// Body for POST /api/bookmarks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub category_id: Option<i64>,
}

/// Body for PUT /api/bookmarks/{id} - every field optional; nullable
/// fields use double-option so an explicit null clears the value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmarkRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
}

/// Generic success message body (delete endpoints)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// CHAT
// =============================================================================

/// Body for POST /api/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateBookmarkRequest = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let null: UpdateBookmarkRequest =
            serde_json::from_str(r#"{"categoryId":null}"#).unwrap();
        assert_eq!(null.category_id, Some(None));

        let set: UpdateBookmarkRequest = serde_json::from_str(r#"{"categoryId":4}"#).unwrap();
        assert_eq!(set.category_id, Some(Some(4)));
    }

    #[test]
    fn test_create_bookmark_camel_case() {
        let req: CreateBookmarkRequest =
            serde_json::from_str(r#"{"name":"n","url":"https://e.com","categoryId":2}"#).unwrap();
        assert_eq!(req.category_id, Some(2));
    }

    #[test]
    fn test_credentials_default_empty() {
        let req: CredentialsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_empty());
        assert!(req.password.is_empty());
    }
}
