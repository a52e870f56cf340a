//! Chat intake endpoint.

use axum::extract::State;
use axum::Json;
use intake::{ChatRequest, ChatResponse};
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Run one chat turn.
///
/// Collaborator failures are answered in-band by the orchestrator, so the
/// only error here is a request without a session id.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("session_id is required".to_string()));
    }

    debug!(session_id = %request.session_id, "Chat turn");
    Ok(Json(state.chat.handle(request).await))
}
