//! Provider abstractions for LLM generation
//!
//! This module provides a trait-based abstraction so the RAG services can run
//! against Gemini in production and a stub in tests.

pub mod gemini;
pub mod llm;

use std::sync::Arc;

use crate::config::LlmConfig;

pub use gemini::GeminiProvider;
pub use llm::{CompletionOptions, LlmProvider};

/// Build the configured LLM provider, or `None` when no API key is set
pub fn from_config(config: &LlmConfig) -> crate::Result<Option<Arc<dyn LlmProvider>>> {
    if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        tracing::warn!("GEMINI_API_KEY not set; chat, memo and red-flag endpoints will return 503");
        return Ok(None);
    }

    let provider = GeminiProvider::new(config)?;
    Ok(Some(Arc::new(provider)))
}
