//! Gemini client via Google AI Studio
//!
//! Key-authenticated `generateContent` calls; one request per completion, no retries.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::llm::{CompletionOptions, LlmProvider};

/// Gemini provider
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider from configuration; fails without an API key
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is required for Gemini".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::info!(model = %config.model, "Gemini provider initialized");

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the API endpoint URL
    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }
}

#[derive(serde::Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(serde::Serialize)]
struct Part {
    text: String,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(serde::Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint("generateContent"))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        gen_response
            .into_text()
            .ok_or_else(|| Error::Llm("No text in Gemini response".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = LlmConfig::default();
        assert!(matches!(GeminiProvider::new(&config), Err(Error::Config(_))));

        let config = LlmConfig {
            api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(GeminiProvider::new(&config).is_err());
    }

    #[test]
    fn test_endpoint() {
        let config = LlmConfig {
            api_key: Some("k".into()),
            base_url: "https://example.test/v1beta/".into(),
            ..Default::default()
        };
        let provider = GeminiProvider::new(&config).unwrap();
        assert_eq!(
            provider.endpoint("generateContent"),
            format!("https://example.test/v1beta/models/{}:generateContent", config.model)
        );
    }

    #[test]
    fn test_response_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Bună "},{"text":"ziua"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Bună ziua"));

        let blocked: GenerateResponse = serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(blocked.into_text().is_none());

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_text().is_none());
    }
}
