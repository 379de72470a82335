//! Bookmark handlers
//!
//! The ownership rules, in order:
//! - a bookmark is visible only to its owner (404 before 403: a missing
//!   record is "not found", someone else's is "forbidden")
//! - filtering or filing by category requires owning that category
//!   (absent and foreign categories are both rejected as forbidden, so
//!   probing ids reveals nothing)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::state::AppState;
use super::types::{
    CreateBookmarkRequest, ListBookmarksQuery, MessageResponse, UpdateBookmarkRequest,
};
use crate::auth::AuthUser;
use crate::errors::{AppError, ValidationErrorExt};
use crate::storage::{Bookmark, BookmarkPatch, NewBookmark};
use crate::validation;

/// Ensure a category exists and belongs to the caller
fn check_category_ownership(
    state: &AppState,
    category_id: i64,
    user_id: i64,
    action: &str,
) -> Result<(), AppError> {
    match state.store().get_category(category_id)? {
        Some(category) if category.user_id == user_id => Ok(()),
        // Absent and foreign categories produce the same rejection
        _ => Err(AppError::Forbidden(format!("{action} this category"))),
    }
}

/// GET /api/bookmarks - List the caller's bookmarks
/// Query params: ?categoryId=3 narrows to one owned category
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListBookmarksQuery>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = match query.category_id {
        Some(category_id) => {
            check_category_ownership(&state, category_id, user.id, "access")?;
            state.store().get_bookmarks_by_category(category_id)?
        }
        None => state.store().get_bookmarks(user.id)?,
    };

    Ok(Json(bookmarks))
}

/// GET /api/bookmarks/{id} - Fetch a single owned bookmark
pub async fn get_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(bookmark_id): Path<i64>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = state
        .store()
        .get_bookmark(bookmark_id)?
        .ok_or(AppError::BookmarkNotFound(bookmark_id))?;

    if bookmark.user_id != user.id {
        return Err(AppError::Forbidden("access this bookmark".to_string()));
    }

    Ok(Json(bookmark))
}

/// POST /api/bookmarks - Create a bookmark owned by the caller
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    validation::validate_bookmark_name(&req.name).map_validation_err("name")?;
    validation::validate_url(&req.url).map_validation_err("url")?;
    if let Some(ref username) = req.username {
        validation::validate_credential(username).map_validation_err("username")?;
    }
    if let Some(ref password) = req.password {
        validation::validate_credential(password).map_validation_err("password")?;
    }

    if let Some(category_id) = req.category_id {
        check_category_ownership(&state, category_id, user.id, "use")?;
    }

    let bookmark = state.store().create_bookmark(NewBookmark {
        name: req.name,
        url: req.url,
        username: req.username,
        password: req.password,
        category_id: req.category_id,
        user_id: user.id,
    })?;

    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// PUT /api/bookmarks/{id} - Partially update an owned bookmark
///
/// Fields absent from the body are untouched; explicit nulls clear the
/// nullable fields (site credentials, category).
pub async fn update_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(bookmark_id): Path<i64>,
    Json(req): Json<UpdateBookmarkRequest>,
) -> Result<Json<Bookmark>, AppError> {
    let existing = state
        .store()
        .get_bookmark(bookmark_id)?
        .ok_or(AppError::BookmarkNotFound(bookmark_id))?;

    if existing.user_id != user.id {
        return Err(AppError::Forbidden("update this bookmark".to_string()));
    }

    if let Some(ref name) = req.name {
        validation::validate_bookmark_name(name).map_validation_err("name")?;
    }
    if let Some(ref url) = req.url {
        validation::validate_url(url).map_validation_err("url")?;
    }
    if let Some(Some(ref username)) = req.username {
        validation::validate_credential(username).map_validation_err("username")?;
    }
    if let Some(Some(ref password)) = req.password {
        validation::validate_credential(password).map_validation_err("password")?;
    }

    // Re-filing into a different category requires owning the target;
    // clearing the category (null) is always allowed.
    if let Some(Some(new_category)) = req.category_id {
        if Some(new_category) != existing.category_id {
            check_category_ownership(&state, new_category, user.id, "use")?;
        }
    }

    let updated = state
        .store()
        .update_bookmark(
            bookmark_id,
            BookmarkPatch {
                name: req.name,
                url: req.url,
                username: req.username,
                password: req.password,
                category_id: req.category_id,
            },
        )?
        // Deleted between the ownership check and the update
        .ok_or(AppError::BookmarkNotFound(bookmark_id))?;

    Ok(Json(updated))
}

/// DELETE /api/bookmarks/{id} - Delete an owned bookmark
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(bookmark_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let bookmark = state
        .store()
        .get_bookmark(bookmark_id)?
        .ok_or(AppError::BookmarkNotFound(bookmark_id))?;

    if bookmark.user_id != user.id {
        return Err(AppError::Forbidden("delete this bookmark".to_string()));
    }

    if !state.store().delete_bookmark(bookmark_id)? {
        return Err(AppError::StorageError(
            "Failed to delete bookmark".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Bookmark deleted successfully".to_string(),
    }))
}
