//! Decision listing, lookup, statistics and upload endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::{Error, Result};
use crate::parsing::{parse_decision_text, split_sections, CriticismCode, CRITICISM_CODES};
use crate::server::state::AppState;
use crate::services::documents::extract_text;
use crate::storage::InsertOutcome;
use crate::types::{
    DecisionDetail, DecisionListResponse, DecisionStats, DecisionSummary, ListQuery,
};

/// GET /api/v1/decisions - Paginated decision summaries
pub async fn list_decisions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DecisionListResponse>> {
    let filter = query.into_filter()?;
    let db = state.db()?;

    tracing::info!(
        limit = filter.limit,
        offset = filter.offset,
        ruling = ?filter.outcome,
        year = ?filter.year,
        "list decisions"
    );

    let (decisions, total) = tokio::task::spawn_blocking(move || db.list(&filter)).await??;

    Ok(Json(DecisionListResponse {
        decisions: decisions.iter().map(|d| d.summary()).collect(),
        total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// GET /api/v1/decisions/:id - Full decision with sections
pub async fn get_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DecisionDetail>> {
    let db = state.db()?;
    let lookup = id.clone();
    let decision = tokio::task::spawn_blocking(move || db.get(&lookup))
        .await??
        .ok_or(Error::NotFound(id))?;

    Ok(Json(DecisionDetail {
        external_id: decision.external_id(),
        title: decision.title(),
        sections: split_sections(&decision.full_text),
        decision,
    }))
}

/// GET /api/v1/decisions/stats/overview
pub async fn stats_overview(State(state): State<AppState>) -> Result<Json<DecisionStats>> {
    let db = state.db()?;
    let stats = tokio::task::spawn_blocking(move || db.stats()).await??;
    Ok(Json(stats))
}

/// GET /api/v1/decisions/codes - Criticism code legend
pub async fn criticism_codes() -> Json<&'static [CriticismCode]> {
    let codes: &'static [CriticismCode] = &CRITICISM_CODES;
    Json(codes)
}

/// POST /api/v1/decisions/upload - Parse and store one decision file
pub async fn upload_decision(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DecisionSummary>)> {
    let db = state.db()?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
        .ok_or_else(|| Error::validation("No file in upload"))?;

    let filename = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| Error::validation("Filename is required"))?;
    let mime_type = field.content_type().map(str::to_string);

    let lower = filename.to_lowercase();
    if !(lower.ends_with(".txt") || lower.ends_with(".pdf")) {
        return Err(Error::validation("Only .txt and .pdf files are supported"));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;

    tracing::info!(filename = %filename, size_bytes = data.len(), "upload decision");

    let (id, decision) = tokio::task::spawn_blocking(move || -> Result<_> {
        let text = extract_text(&filename, &data, mime_type.as_deref())?;
        // Stored under the .txt name so the filename convention still applies
        let stored_name = match filename.rsplit_once('.') {
            Some((stem, ext)) if ext.eq_ignore_ascii_case("pdf") => format!("{}.txt", stem),
            _ => filename.clone(),
        };

        let parsed = parse_decision_text(&text, Some(stored_name.as_str()));
        if !parsed.has_identity() {
            return Err(Error::validation(format!(
                "Filename does not follow BO{{year}}_{{bulletin}}_... convention: {}",
                filename
            )));
        }

        match db.insert_decision(&parsed)? {
            InsertOutcome::Inserted(id) => Ok((id.clone(), db.get(&id)?)),
            InsertOutcome::Duplicate => Err(Error::Conflict(parsed.external_id())),
        }
    })
    .await??;

    let decision =
        decision.ok_or_else(|| Error::internal(format!("Stored decision {} not readable", id)))?;
    tracing::info!(id = %decision.id, external_id = %decision.external_id(), "decision stored");

    Ok((StatusCode::CREATED, Json(decision.summary())))
}
