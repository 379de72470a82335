//! Structured error types for the REST API
//!
//! Every error carries a machine-readable code and maps to a proper
//! HTTP status, so clients can branch without string matching.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error response for API clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error types with proper categorization
#[derive(Debug)]
pub enum AppError {
    // Validation Errors (400)
    InvalidInput { field: String, reason: String },
    UsernameTaken(String),

    // Authentication Errors (401)
    InvalidCredentials,
    Unauthenticated,

    // Authorization Errors (403)
    Forbidden(String),

    // Not Found Errors (404)
    UserNotFound(i64),
    CategoryNotFound(i64),
    BookmarkNotFound(i64),

    // Upstream Errors (502)
    ChatBackend(String),

    // Internal Errors (500)
    StorageError(String),
    Internal(anyhow::Error),
}

impl AppError {
    /// Get error code for client identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::BookmarkNotFound(_) => "BOOKMARK_NOT_FOUND",
            Self::ChatBackend(_) => "CHAT_BACKEND",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::UsernameTaken(_) => StatusCode::BAD_REQUEST,

            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,

            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::UserNotFound(_) | Self::CategoryNotFound(_) | Self::BookmarkNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            Self::ChatBackend(_) => StatusCode::BAD_GATEWAY,

            Self::StorageError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => {
                format!("Invalid input for field '{field}': {reason}")
            }
            Self::UsernameTaken(name) => format!("Username already exists: {name}"),
            Self::InvalidCredentials => "Invalid username or password".to_string(),
            Self::Unauthenticated => "Authentication required".to_string(),
            Self::Forbidden(what) => format!("Not authorized to {what}"),
            Self::UserNotFound(id) => format!("User not found: {id}"),
            Self::CategoryNotFound(id) => format!("Category not found: {id}"),
            Self::BookmarkNotFound(id) => format!("Bookmark not found: {id}"),
            Self::ChatBackend(msg) => format!("Chat backend error: {msg}"),
            Self::StorageError(msg) => format!("Storage error: {msg}"),
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }

    /// Convert to structured error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message(),
            details: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

/// Convert from anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Axum IntoResponse implementation for proper HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_response();

        (status, Json(body)).into_response()
    }
}

/// Helper trait to convert validation errors
pub trait ValidationErrorExt<T> {
    fn map_validation_err(self, field: &str) -> Result<T>;
}

impl<T> ValidationErrorExt<T> for anyhow::Result<T> {
    fn map_validation_err(self, field: &str) -> Result<T> {
        self.map_err(|e| AppError::InvalidInput {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
