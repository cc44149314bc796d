//! Decision retrieval: keyword search with trigram fallback

pub mod search;
pub mod trigram;

pub use search::{extract_keywords, DecisionRetriever};
pub use trigram::{query_coverage, TrigramSet};
