//! Document analysis types

use serde::{Deserialize, Serialize};

/// POST /api/v1/documents/analyze payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalyzeRequest {
    /// Original filename, used to pick the extractor
    pub filename: String,
    /// Base64-encoded file content
    pub content: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Basic counts over extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    pub paragraphs: usize,
}

/// POST /api/v1/documents/analyze response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalyzeResponse {
    pub filename: String,
    pub text: String,
    pub stats: TextStats,
    pub success: bool,
}
