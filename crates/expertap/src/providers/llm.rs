//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Sampling options for a single completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionOptions {
    /// Grounded chat answers and memos
    pub const ANSWER: Self = Self {
        temperature: 0.1,
        max_output_tokens: 2048,
    };

    /// Structured red-flag analysis
    pub const ANALYSIS: Self = Self {
        temperature: 0.1,
        max_output_tokens: 4096,
    };
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::ANSWER
    }
}

/// Trait for LLM-based text generation
///
/// Implementations:
/// - `GeminiProvider`: Google AI Studio generateContent API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully built prompt
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
