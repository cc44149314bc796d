//! Decision search endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::services::search;
use crate::types::{SearchRequest, SearchResponse};

/// POST /api/v1/search - Filtered search over stored decisions
pub async fn search_decisions(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();
    request.validate()?;
    let retriever = state.retriever()?;

    let (results, total, request) = tokio::task::spawn_blocking(move || {
        search::search(&retriever, &request).map(|(results, total)| (results, total, request))
    })
    .await??;

    Ok(Json(SearchResponse {
        query: request.query,
        results,
        total,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
