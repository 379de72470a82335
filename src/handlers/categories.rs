//! Category handlers
//!
//! Categories are flat, per-user labels. Every operation checks ownership
//! before touching storage.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::state::AppState;
use super::types::{CreateCategoryRequest, MessageResponse};
use crate::auth::AuthUser;
use crate::errors::{AppError, ValidationErrorExt};
use crate::storage::{Category, NewCategory};
use crate::validation;

/// GET /api/categories - List the caller's categories
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.store().get_categories(user.id)?;
    Ok(Json(categories))
}

/// POST /api/categories - Create a category owned by the caller
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    validation::validate_category_name(&req.name).map_validation_err("name")?;

    let category = state.store().create_category(NewCategory {
        name: req.name,
        user_id: user.id,
    })?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/categories/{id} - Delete an owned category
///
/// Member bookmarks are left in place (their category reference dangles),
/// so deleting a category never loses bookmarks.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(category_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let category = state
        .store()
        .get_category(category_id)?
        .ok_or(AppError::CategoryNotFound(category_id))?;

    if category.user_id != user.id {
        return Err(AppError::Forbidden("delete this category".to_string()));
    }

    if !state.store().delete_category(category_id)? {
        return Err(AppError::StorageError(
            "Failed to delete category".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Category deleted successfully".to_string(),
    }))
}
