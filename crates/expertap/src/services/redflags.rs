//! Red-flag detection in procurement documentation
//!
//! The LLM is asked for JSON only; its answer is parsed leniently and every finding
//! is tagged with the CNSC decisions that were shown to it.

use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{CompletionOptions, LlmProvider};
use crate::retrieval::DecisionRetriever;
use crate::types::{Decision, RedFlag, RedFlagsRequest, RedFlagsResponse, Severity};

/// Phrases that usually mark restrictive clauses
const RED_FLAG_TERMS: &[&str] = &[
    "experiență similară",
    "cifră afaceri",
    "certificare",
    "personal",
    "referințe",
    "clauză restrictivă",
];

const MAX_SEARCH_TERMS: usize = 3;
const MAX_RELATED_DECISIONS: usize = 3;

/// Analyzes documentation against the LLM, optionally with jurisprudence
#[derive(Clone)]
pub struct RedFlagsAnalyzer {
    retriever: Option<DecisionRetriever>,
    llm: Arc<dyn LlmProvider>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    red_flags: Vec<RawFlag>,
}

#[derive(Deserialize)]
struct RawFlag {
    #[serde(default)]
    category: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    clause: String,
    #[serde(default)]
    issue: String,
    #[serde(default)]
    legal_reference: String,
    #[serde(default)]
    recommendation: String,
}

impl RedFlagsAnalyzer {
    /// `retriever` is `None` when the server runs without a decision store
    pub fn new(retriever: Option<DecisionRetriever>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { retriever, llm }
    }

    pub async fn analyze(&self, request: RedFlagsRequest) -> Result<RedFlagsResponse> {
        request.validate()?;

        tracing::info!(
            text_chars = request.text.chars().count(),
            use_jurisprudence = request.use_jurisprudence,
            "analyzing red flags"
        );

        let decisions = match (&self.retriever, request.use_jurisprudence) {
            (Some(retriever), true) => self.related_decisions(retriever, &request.text).await?,
            _ => Vec::new(),
        };
        let decision_refs: Vec<String> = decisions.iter().map(Decision::external_id).collect();

        let prompt = PromptBuilder::build_red_flags_prompt(&request.text, &decisions);

        let flags = match self.llm.complete(&prompt, &CompletionOptions::ANALYSIS).await {
            Ok(raw) => parse_flags(&raw, &decision_refs),
            Err(e) => {
                tracing::warn!(error = %e, "red-flag analysis unavailable");
                vec![error_flag("Analiza automată nu este disponibilă momentan.".to_string())]
            }
        };

        tracing::info!(
            count = flags.len(),
            has_jurisprudence = !decision_refs.is_empty(),
            "red flags analyzed"
        );

        Ok(RedFlagsResponse::new(flags, !decision_refs.is_empty()))
    }

    async fn related_decisions(
        &self,
        retriever: &DecisionRetriever,
        text: &str,
    ) -> Result<Vec<Decision>> {
        let terms = red_flag_terms(text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let retriever = retriever.clone();
        let decisions = tokio::task::spawn_blocking(move || {
            retriever.related(&terms, MAX_RELATED_DECISIONS)
        })
        .await??;

        tracing::info!(count = decisions.len(), "related decisions found");
        Ok(decisions)
    }
}

/// Known red-flag terms present in `text`, at most three
pub fn red_flag_terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    RED_FLAG_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .take(MAX_SEARCH_TERMS)
        .map(|term| term.to_string())
        .collect()
}

/// JSON body of an LLM reply, with Markdown code fences removed
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let inner = if let Some((_, rest)) = trimmed.split_once("```json") {
        rest
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest
    } else {
        return trimmed;
    };

    inner.split("```").next().unwrap_or(inner).trim()
}

/// Findings from an LLM reply; malformed JSON becomes a single `INFO` finding
pub fn parse_flags(raw: &str, decision_refs: &[String]) -> Vec<RedFlag> {
    let parsed: RawResponse = match serde_json::from_str(strip_code_fence(raw)) {
        Ok(parsed) => parsed,
        Err(e) => {
            let preview: String = raw.chars().take(500).collect();
            tracing::error!(error = %e, response = %preview, "red-flag JSON parse error");
            return vec![error_flag(format!("Nu s-a putut parsa răspunsul AI: {}", e))];
        }
    };

    parsed
        .red_flags
        .into_iter()
        .map(|flag| RedFlag {
            severity: normalize_severity(&flag.severity),
            category: flag.category,
            clause: flag.clause,
            issue: flag.issue,
            legal_reference: flag.legal_reference,
            recommendation: flag.recommendation,
            decision_refs: decision_refs.to_vec(),
        })
        .collect()
}

fn normalize_severity(raw: &str) -> Severity {
    Severity::parse(raw).unwrap_or_else(|| {
        tracing::warn!(severity = raw, "unknown severity, using MEDIE");
        Severity::Medie
    })
}

fn error_flag(issue: String) -> RedFlag {
    RedFlag {
        category: "Eroare".to_string(),
        severity: Severity::Info,
        clause: String::new(),
        issue,
        legal_reference: String::new(),
        recommendation: "Verifică manual documentația.".to_string(),
        decision_refs: Vec::new(),
    }
}
