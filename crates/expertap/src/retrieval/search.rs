//! Decision retrieval for grounded answers
//!
//! Keyword substring search first; when that finds nothing, trigram similarity over
//! the full text. A query with no usable keywords gets the most recent decisions.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::storage::DecisionDb;
use crate::types::Decision;

/// Words carrying no search signal in Romanian questions about CNSC decisions
const STOP_WORDS: &[&str] = &[
    "ce", "sunt", "este", "cum", "care", "din", "la", "în", "și", "sau", "pentru", "cu",
    "despre", "pe", "de", "a", "ai", "am", "ma", "mi", "le", "îmi", "îți", "și-a", "dat",
    "dau", "da", "spune", "spune-mi", "decizii", "decizie", "cnsc", "avem", "baza", "date",
];

const TRIM_CHARS: &[char] = &['.', ',', '?', '!', ';', ':'];

/// Lowercased search keywords of a free-text question
pub fn extract_keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for word in query.to_lowercase().split_whitespace() {
        let word = word.trim_matches(TRIM_CHARS);
        if word.chars().count() < 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }

    tracing::debug!(keywords = ?keywords, "extracted keywords");
    keywords
}

/// Finds the decisions most relevant to a question
#[derive(Clone)]
pub struct DecisionRetriever {
    db: Arc<DecisionDb>,
    similarity_threshold: f32,
}

impl DecisionRetriever {
    pub fn new(db: Arc<DecisionDb>, config: &RetrievalConfig) -> Self {
        Self {
            db,
            similarity_threshold: config.similarity_threshold,
        }
    }

    /// Up to `limit` decisions for `query`, most recent first
    ///
    /// Blocking; call from `spawn_blocking` in async contexts.
    pub fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Decision>> {
        let keywords = extract_keywords(query);

        if keywords.is_empty() {
            let decisions = self.db.recent(limit)?;
            tracing::info!(count = decisions.len(), "no keywords, using recent decisions");
            return Ok(decisions);
        }

        let decisions = self.db.search_keywords(&keywords, limit)?;
        if !decisions.is_empty() {
            tracing::info!(count = decisions.len(), "decisions found by keyword");
            return Ok(decisions);
        }

        let decisions = self
            .db
            .search_trigram(query, self.similarity_threshold, limit)?;
        tracing::info!(
            count = decisions.len(),
            threshold = self.similarity_threshold,
            "decisions found by trigram similarity"
        );
        Ok(decisions)
    }

    /// Decisions whose text contains any of `terms`, for red-flag jurisprudence
    pub fn related(&self, terms: &[String], limit: usize) -> Result<Vec<Decision>> {
        self.db.search_text(terms, limit)
    }
}
