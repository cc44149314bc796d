//! API routes for the ExpertAP server

pub mod chat;
pub mod decisions;
pub mod documents;
pub mod ragmemo;
pub mod redflags;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all `/api/v1` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Decisions
        .route("/decisions", get(decisions::list_decisions))
        .route("/decisions/upload", post(decisions::upload_decision))
        .route("/decisions/stats/overview", get(decisions::stats_overview))
        .route("/decisions/codes", get(decisions::criticism_codes))
        .route("/decisions/:id", get(decisions::get_decision))
        .route("/search", post(search::search_decisions))
        // Assistant
        .route("/chat", post(chat::chat))
        .route("/ragmemo", post(ragmemo::generate_memo))
        .route("/redflags", post(redflags::analyze_red_flags))
        // Documents
        .route("/documents/analyze", post(documents::analyze_document))
        .route("/documents/upload", post(documents::upload_document))
}
