//! Chat assistant handler

use axum::{extract::State, Extension, Json};
use std::time::Instant;
use tracing::debug;

use super::state::AppState;
use super::types::ChatRequest;
use crate::assistant::ChatReply;
use crate::auth::AuthUser;
use crate::errors::{AppError, ValidationErrorExt};
use crate::metrics;
use crate::validation;

/// POST /api/chat - Forward a conversation to the assistant
///
/// The backend being down is not a request failure: the reply carries
/// `success: false` and a hint on starting the local LLM server.
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    validation::validate_chat_messages(
        req.messages
            .iter()
            .map(|m| (m.role.as_str(), m.content.as_str())),
    )
    .map_validation_err("messages")?;

    debug!(
        "Chat request from '{}' with {} message(s)",
        user.username,
        req.messages.len()
    );

    let start = Instant::now();
    let reply = state.assistant().chat(&req.messages).await;
    metrics::CHAT_REQUEST_DURATION.observe(start.elapsed().as_secs_f64());
    metrics::CHAT_REQUESTS_TOTAL
        .with_label_values(&[if reply.success { "ok" } else { "fallback" }])
        .inc();

    Ok(Json(reply))
}
