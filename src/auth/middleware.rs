//! Session authentication middleware
//!
//! Resolves the session cookie to its owning user and injects an
//! [`AuthUser`] into request extensions. Handlers behind this middleware
//! can extract it infallibly with `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::session;
use crate::errors::AppError;
use crate::handlers::state::AppState;

/// The authenticated caller, injected by [`require_session`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Reject unauthenticated requests, attach [`AuthUser`] otherwise
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session::token_from_headers(request.headers()) else {
        return AppError::Unauthenticated.into_response();
    };

    let Some(live) = state.sessions().resolve(&token) else {
        return AppError::Unauthenticated.into_response();
    };

    // Session may outlive its account (account deletion revokes sessions,
    // but a race is possible) - treat a missing user as unauthenticated.
    let user = match state.store().get_user(live.user_id) {
        Ok(Some(user)) => user,
        Ok(None) => {
            state.sessions().revoke(&token);
            return AppError::Unauthenticated.into_response();
        }
        Err(e) => return AppError::Internal(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
    });

    next.run(request).await
}
