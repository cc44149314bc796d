//! Pagination and filtering for decision listings

use serde::{Deserialize, Serialize};

use super::decision::{DecisionSummary, Outcome};
use crate::error::{Error, Result};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Query string of GET /api/v1/decisions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    /// Outcome filter (ADMIS, ADMIS_PARTIAL, RESPINS)
    pub ruling: Option<String>,
    /// Bulletin year filter
    pub year: Option<i32>,
}

/// Validated listing parameters handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionFilter {
    pub limit: u32,
    pub offset: u64,
    pub outcome: Option<Outcome>,
    pub year: Option<i32>,
}

impl Default for DecisionFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            outcome: None,
            year: None,
        }
    }
}

impl ListQuery {
    pub fn into_filter(self) -> Result<DecisionFilter> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(Error::validation(format!(
                "limit must be within 1..={}",
                MAX_PAGE_LIMIT
            )));
        }

        let outcome = match self.ruling.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Outcome::parse(raw)
                    .ok_or_else(|| Error::validation(format!("unknown ruling: {}", raw)))?,
            ),
        };

        Ok(DecisionFilter {
            limit,
            offset: self.offset.unwrap_or(0),
            outcome,
            year: self.year,
        })
    }
}

/// GET /api/v1/decisions response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionListResponse {
    pub decisions: Vec<DecisionSummary>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}
