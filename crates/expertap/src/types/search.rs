//! Decision search request/response types

use serde::{Deserialize, Serialize};

use super::decision::{Decision, Outcome};
use crate::error::{Error, Result};

pub const MAX_QUERY_CHARS: usize = 1000;
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Optional restrictions applied to search candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Any of these codes (D1..D7, DAL, R1..R7, RAL)
    pub criticism_codes: Vec<String>,
    /// CPV code prefixes, e.g. `45` or `55520000-1`
    pub cpv_codes: Vec<String>,
    /// ADMIS, ADMIS_PARTIAL or RESPINS
    pub ruling: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

/// POST /api/v1/search payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    10
}

impl SearchRequest {
    pub fn validate(&self) -> Result<()> {
        let len = self.query.trim().chars().count();
        if !(3..=MAX_QUERY_CHARS).contains(&len) {
            return Err(Error::validation(format!(
                "query must have between 3 and {} characters",
                MAX_QUERY_CHARS
            )));
        }
        if !(1..=MAX_SEARCH_RESULTS).contains(&self.limit) {
            return Err(Error::validation(format!(
                "limit must be within 1..={}",
                MAX_SEARCH_RESULTS
            )));
        }
        if let (Some(from), Some(to)) = (self.filters.year_from, self.filters.year_to) {
            if from > to {
                return Err(Error::validation("year_from must not be after year_to"));
            }
        }
        Ok(())
    }
}

/// Filters with the ruling parsed and codes normalised
#[derive(Debug, Clone, Default)]
pub struct DecisionMatcher {
    codes: Vec<String>,
    cpv_prefixes: Vec<String>,
    outcome: Option<Outcome>,
    year_from: Option<i32>,
    year_to: Option<i32>,
}

impl DecisionMatcher {
    pub fn from_filters(filters: &SearchFilters) -> Result<Self> {
        let outcome = match filters.ruling.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Outcome::parse(raw)
                    .ok_or_else(|| Error::validation(format!("unknown ruling: {}", raw)))?,
            ),
        };

        Ok(Self {
            codes: filters
                .criticism_codes
                .iter()
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            cpv_prefixes: filters
                .cpv_codes
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            outcome,
            year_from: filters.year_from,
            year_to: filters.year_to,
        })
    }

    pub fn matches(&self, decision: &Decision) -> bool {
        if !self.codes.is_empty() && !decision.criticism_codes.iter().any(|c| self.codes.contains(c)) {
            return false;
        }
        if !self.cpv_prefixes.is_empty() {
            let Some(cpv) = decision.cpv_code.as_deref() else {
                return false;
            };
            if !self.cpv_prefixes.iter().any(|p| cpv.starts_with(p.as_str())) {
                return false;
            }
        }
        if self.outcome.is_some() && decision.outcome != self.outcome {
            return false;
        }
        if self.year_from.is_some_and(|y| decision.bulletin_year < y) {
            return false;
        }
        if self.year_to.is_some_and(|y| decision.bulletin_year > y) {
            return false;
        }
        true
    }
}

/// One ranked search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub decision_id: String,
    pub external_id: String,
    pub title: String,
    /// Verbatim excerpt of the decision text
    pub excerpt: String,
    /// Share of the query's trigrams found in the decision, 0.0-1.0
    pub score: f32,
    pub outcome: Option<Outcome>,
    pub criticism_codes: Vec<String>,
}

/// POST /api/v1/search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Matches before truncation to `limit`
    pub total: usize,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            filters: SearchFilters::default(),
            limit: 10,
        }
    }

    #[test]
    fn test_validate_bounds() {
        assert!(request("ab").validate().is_err());
        assert!(request("garanție").validate().is_ok());

        let mut req = request("garanție");
        req.limit = 0;
        assert!(req.validate().is_err());

        let mut req = request("garanție");
        req.filters.year_from = Some(2025);
        req.filters.year_to = Some(2024);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_ruling() {
        let filters = SearchFilters {
            ruling: Some("poate".into()),
            ..Default::default()
        };
        assert!(DecisionMatcher::from_filters(&filters).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query":"garanție"}"#).unwrap();
        assert_eq!(req.limit, 10);
        assert!(req.filters.criticism_codes.is_empty());
    }
}
