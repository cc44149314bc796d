//! Chat and memo request/response types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum chat message length in characters
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of prior conversation, carried in the request only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// POST /api/v1/chat payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<()> {
        let len = self.message.chars().count();
        if self.message.trim().is_empty() {
            return Err(Error::validation("message must not be empty"));
        }
        if len > MAX_MESSAGE_CHARS {
            return Err(Error::validation(format!(
                "message exceeds {} characters ({})",
                MAX_MESSAGE_CHARS, len
            )));
        }
        Ok(())
    }
}

/// A quoted excerpt tied to a stored decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Surrogate id of the referenced decision
    pub decision_id: String,
    /// `BO{year}_{number}` of the referenced decision
    pub external_id: String,
    /// Quoted excerpt
    pub text: String,
    /// True iff `text` occurs verbatim in the decision's stored text
    pub verified: bool,
}

/// POST /api/v1/chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    pub citations: Vec<Citation>,
    /// 0.0-1.0
    pub confidence: f32,
    /// False when no decision backed the answer or the LLM call failed
    pub grounded: bool,
    pub suggested_questions: Vec<String>,
}

/// POST /api/v1/ragmemo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoRequest {
    pub topic: String,
    #[serde(default = "default_memo_decisions")]
    pub max_decisions: usize,
}

fn default_memo_decisions() -> usize {
    5
}

impl MemoRequest {
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().chars().count() < 3 {
            return Err(Error::validation("topic must have at least 3 characters"));
        }
        if !(1..=10).contains(&self.max_decisions) {
            return Err(Error::validation("max_decisions must be within 1..=10"));
        }
        Ok(())
    }
}

/// POST /api/v1/ragmemo response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoResponse {
    pub memo: String,
    pub topic: String,
    pub decisions_used: usize,
    pub confidence: f32,
}
