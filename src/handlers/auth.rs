//! Account and session handlers
//!
//! Registration, login, logout, current-user lookup, account deletion.
//! Register and login open a session and install the cookie; logout always
//! succeeds and clears it.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::AppendHeaders,
    Extension, Json,
};
use tracing::{debug, info};

use super::state::AppState;
use super::types::{CredentialsRequest, DeleteAccountResponse, MessageResponse, SessionUser};
use crate::auth::{self, session, AuthUser};
use crate::errors::{AppError, ValidationErrorExt};
use crate::metrics;
use crate::storage::NewUser;
use crate::validation;

type SetCookie = AppendHeaders<[(HeaderName, String); 1]>;

fn set_cookie(value: String) -> SetCookie {
    AppendHeaders([(header::SET_COOKIE, value)])
}

/// POST /api/register - Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, SetCookie, Json<SessionUser>), AppError> {
    validation::validate_username(&req.username).map_validation_err("username")?;
    validation::validate_password(&req.password).map_validation_err("password")?;

    if state.store().get_user_by_username(&req.username)?.is_some() {
        metrics::AUTH_ATTEMPTS_TOTAL
            .with_label_values(&["register", "rejected"])
            .inc();
        return Err(AppError::UsernameTaken(req.username));
    }

    let password_hash = auth::hash_password(&req.password)?;
    // The store re-checks uniqueness under its write lock; a concurrent
    // register with the same name loses here.
    let user = state
        .store()
        .create_user(NewUser {
            username: req.username.clone(),
            password_hash,
        })
        .map_err(|_| AppError::UsernameTaken(req.username))?;

    let opened = state.sessions().create(user.id);
    metrics::AUTH_ATTEMPTS_TOTAL
        .with_label_values(&["register", "ok"])
        .inc();
    info!("Registered user '{}' (id {})", user.username, user.id);

    let cookie = session::session_cookie(
        &opened.token,
        state.config().session_ttl_secs,
        state.config().cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        set_cookie(cookie),
        Json(SessionUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/login - Authenticate and open a session
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(SetCookie, Json<SessionUser>), AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput {
            field: "credentials".to_string(),
            reason: "username and password are required".to_string(),
        });
    }

    debug!("Login attempt for username: {}", req.username);

    // Unknown user and wrong password are indistinguishable to the caller
    let user = match state.store().get_user_by_username(&req.username)? {
        Some(user) if auth::verify_password(&req.password, &user.password_hash) => user,
        _ => {
            metrics::AUTH_ATTEMPTS_TOTAL
                .with_label_values(&["login", "rejected"])
                .inc();
            return Err(AppError::InvalidCredentials);
        }
    };

    let opened = state.sessions().create(user.id);
    metrics::AUTH_ATTEMPTS_TOTAL
        .with_label_values(&["login", "ok"])
        .inc();
    info!("Login successful for '{}'", user.username);

    let cookie = session::session_cookie(
        &opened.token,
        state.config().session_ttl_secs,
        state.config().cookie_secure,
    );

    Ok((
        set_cookie(cookie),
        Json(SessionUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/logout - Revoke the session if one is presented
///
/// Always 200: logging out without a live session is not an error.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, SetCookie, Json<MessageResponse>) {
    if let Some(token) = session::token_from_headers(&headers) {
        state.sessions().revoke(&token);
    }

    let cookie = session::clear_session_cookie(state.config().cookie_secure);
    (
        StatusCode::OK,
        set_cookie(cookie),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// GET /api/user - The authenticated caller
pub async fn current_user(Extension(user): Extension<AuthUser>) -> Json<SessionUser> {
    Json(SessionUser {
        id: user.id,
        username: user.username,
    })
}

/// DELETE /api/user - Delete the account and everything it owns
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(SetCookie, Json<DeleteAccountResponse>), AppError> {
    let revoked = state.sessions().revoke_user(user.id);
    if !state.store().delete_user(user.id)? {
        return Err(AppError::UserNotFound(user.id));
    }

    info!(
        "Deleted account '{}' (id {}, {} session(s) revoked)",
        user.username, user.id, revoked
    );

    let cookie = session::clear_session_cookie(state.config().cookie_secure);
    Ok((
        set_cookie(cookie),
        Json(DeleteAccountResponse {
            success: true,
            message: "Account and all its data deleted".to_string(),
        }),
    ))
}
