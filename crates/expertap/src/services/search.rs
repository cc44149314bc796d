//! Filtered decision search ranked by trigram coverage

use crate::error::Result;
use crate::generation::citation::select_excerpt;
use crate::retrieval::{extract_keywords, query_coverage, DecisionRetriever};
use crate::types::{DecisionMatcher, SearchRequest, SearchResult};

/// Candidates pulled from the store before filtering
const CANDIDATE_POOL: usize = 200;

/// Matching decisions, best first, and the match count before truncation
///
/// Blocking; call from `spawn_blocking` in async contexts.
pub fn search(retriever: &DecisionRetriever, request: &SearchRequest) -> Result<(Vec<SearchResult>, usize)> {
    request.validate()?;
    let matcher = DecisionMatcher::from_filters(&request.filters)?;
    let query = request.query.trim();
    let keywords = extract_keywords(query);

    let mut results: Vec<SearchResult> = retriever
        .retrieve(query, CANDIDATE_POOL)?
        .into_iter()
        .filter(|d| matcher.matches(d))
        .map(|d| SearchResult {
            score: query_coverage(query, &d.full_text),
            excerpt: select_excerpt(&d.full_text, &keywords).to_string(),
            external_id: d.external_id(),
            title: d.title(),
            outcome: d.outcome,
            criticism_codes: d.criticism_codes,
            decision_id: d.id,
        })
        .collect();

    // Stable: equal scores keep the retrieval order (most recent first)
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    let total = results.len();
    results.truncate(request.limit);

    tracing::info!(query = %query, total, returned = results.len(), "decision search");
    Ok((results, total))
}
