//! Chat endpoint with grounded answers and citations

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /api/v1/chat - Answer a question from stored CNSC decisions
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();
    request.validate()?;

    tracing::info!(
        message_chars = request.message.chars().count(),
        history = request.history.len(),
        conversation_id = request.conversation_id.as_deref().unwrap_or(""),
        "chat request"
    );

    let response = state.rag()?.chat(request).await?;

    tracing::info!(
        conversation_id = %response.conversation_id,
        citations = response.citations.len(),
        grounded = response.grounded,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "chat response"
    );

    Ok(Json(response))
}
