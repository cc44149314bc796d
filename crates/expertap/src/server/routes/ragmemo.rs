//! Legal memo generation endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{MemoRequest, MemoResponse};

/// POST /api/v1/ragmemo - Generate a legal memo backed by CNSC decisions
pub async fn generate_memo(
    State(state): State<AppState>,
    Json(request): Json<MemoRequest>,
) -> Result<Json<MemoResponse>> {
    request.validate()?;
    tracing::info!(topic = %request.topic, max_decisions = request.max_decisions, "memo request");

    let response = state.rag()?.memo(request).await?;
    Ok(Json(response))
}
