//! Red-flag analysis endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{RedFlagsRequest, RedFlagsResponse};

/// POST /api/v1/redflags - Find restrictive clauses in procurement documentation
pub async fn analyze_red_flags(
    State(state): State<AppState>,
    Json(request): Json<RedFlagsRequest>,
) -> Result<Json<RedFlagsResponse>> {
    let analyzer = state.red_flags()?;
    let response = analyzer.analyze(request).await?;
    Ok(Json(response))
}
