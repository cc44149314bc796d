//! Retrieval-augmented answers over CNSC decisions
//!
//! Retrieve, build one grounded prompt, make a single LLM call, then link citations
//! back to the decisions the answer mentions. LLM failures degrade to a fallback
//! message instead of an error.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::generation::{extract_citations, PromptBuilder};
use crate::generation::prompt::SYSTEM_PROMPT;
use crate::providers::{CompletionOptions, LlmProvider};
use crate::retrieval::{extract_keywords, DecisionRetriever};
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, Citation, Decision, MemoRequest, MemoResponse, Outcome,
};

/// Shown when nothing in the store matches the question
pub const NO_DECISIONS_MESSAGE: &str = "Nu am găsit decizii CNSC relevante pentru această întrebare. \
Încearcă să reformulezi întrebarea sau să folosești termeni mai specifici.";

/// Shown when the LLM call fails
pub const LLM_FALLBACK_MESSAGE: &str = "Ne pare rău, asistentul nu a putut genera un răspuns în acest moment. \
Te rugăm să încerci din nou peste câteva momente.";

const MAX_SUGGESTIONS: usize = 4;

/// Result of one RAG round trip
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub message: String,
    pub citations: Vec<Citation>,
    pub confidence: f32,
    pub grounded: bool,
    pub suggested_questions: Vec<String>,
    pub decisions_used: usize,
}

/// Chat and memo generation
#[derive(Clone)]
pub struct RagService {
    retriever: DecisionRetriever,
    llm: Arc<dyn LlmProvider>,
    config: RetrievalConfig,
}

impl RagService {
    pub fn new(retriever: DecisionRetriever, llm: Arc<dyn LlmProvider>, config: RetrievalConfig) -> Self {
        Self {
            retriever,
            llm,
            config,
        }
    }

    /// Answer a chat message
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        request.validate()?;

        let answer = self
            .answer(&request.message, &request.history, self.config.max_decisions)
            .await?;

        Ok(ChatResponse {
            message: answer.message,
            conversation_id: request
                .conversation_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            citations: answer.citations,
            confidence: answer.confidence,
            grounded: answer.grounded,
            suggested_questions: answer.suggested_questions,
        })
    }

    /// Generate a legal memo on a topic
    pub async fn memo(&self, request: MemoRequest) -> Result<MemoResponse> {
        request.validate()?;

        let query = PromptBuilder::memo_query(request.topic.trim());
        let answer = self.answer(&query, &[], request.max_decisions).await?;

        tracing::info!(
            topic = %request.topic,
            decisions_used = answer.decisions_used,
            confidence = answer.confidence,
            "memo generated"
        );

        Ok(MemoResponse {
            memo: answer.message,
            topic: request.topic,
            decisions_used: answer.decisions_used,
            confidence: answer.confidence,
        })
    }

    /// Retrieve, prompt, complete and cite
    pub async fn answer(
        &self,
        query: &str,
        history: &[ChatMessage],
        max_decisions: usize,
    ) -> Result<RagAnswer> {
        let max_decisions = max_decisions.max(1);
        tracing::info!(query_chars = query.chars().count(), max_decisions, "generating RAG answer");

        let retriever = self.retriever.clone();
        let owned_query = query.to_string();
        let decisions = tokio::task::spawn_blocking(move || {
            retriever.retrieve(&owned_query, max_decisions)
        })
        .await??;

        if decisions.is_empty() {
            tracing::warn!("no decisions found for query");
            return Ok(RagAnswer {
                message: NO_DECISIONS_MESSAGE.to_string(),
                citations: Vec::new(),
                confidence: 0.0,
                grounded: false,
                suggested_questions: vec![
                    "Ce decizii CNSC sunt disponibile?".to_string(),
                    "Arată-mi toate deciziile".to_string(),
                ],
                decisions_used: 0,
            });
        }

        let contexts = PromptBuilder::build_context(&decisions, self.config.context_chars);
        let prompt = PromptBuilder::build_prompt(SYSTEM_PROMPT, &contexts, history, query);
        let suggested_questions = suggested_questions(&decisions);

        let text = match self.llm.complete(&prompt, &CompletionOptions::ANSWER).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    provider = self.llm.name(),
                    error = %e,
                    "LLM call failed, returning fallback message"
                );
                return Ok(RagAnswer {
                    message: LLM_FALLBACK_MESSAGE.to_string(),
                    citations: Vec::new(),
                    confidence: 0.0,
                    grounded: false,
                    suggested_questions,
                    decisions_used: decisions.len(),
                });
            }
        };

        let keywords = extract_keywords(query);
        let citations = extract_citations(&text, &decisions, &keywords);
        let confidence = (decisions.len() as f32 / max_decisions as f32).min(1.0);

        tracing::info!(
            decisions_used = decisions.len(),
            citations = citations.len(),
            confidence,
            "RAG answer generated"
        );

        Ok(RagAnswer {
            message: text,
            citations,
            confidence,
            grounded: true,
            suggested_questions,
            decisions_used: decisions.len(),
        })
    }
}

/// Follow-up questions derived from the codes and outcomes of the retrieved decisions
pub fn suggested_questions(decisions: &[Decision]) -> Vec<String> {
    let codes: BTreeSet<&str> = decisions
        .iter()
        .flat_map(|d| d.criticism_codes.iter().map(String::as_str))
        .collect();
    let outcomes: HashSet<Outcome> = decisions.iter().filter_map(|d| d.outcome).collect();

    let mut suggestions = Vec::new();

    if !codes.is_empty() {
        let listed: Vec<&str> = codes.into_iter().take(3).collect();
        suggestions.push(format!(
            "Ce jurisprudență există pentru criticile {}?",
            listed.join(", ")
        ));
    }

    if outcomes.iter().any(Outcome::is_admitted) {
        suggestions.push("Care sunt argumentele care au dus la admiterea contestației?".to_string());
    }

    if outcomes.contains(&Outcome::Respins) {
        suggestions.push("De ce au fost respinse aceste contestații?".to_string());
    }

    suggestions.push("Arată-mi decizii similare".to_string());
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parsing::parse_decision_text;
    use crate::storage::DecisionDb;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct ScriptedLlm {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| Error::Llm("upstream unavailable".into()))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.reply.is_some())
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }
    }

    fn service(reply: Option<&str>) -> (RagService, Arc<ScriptedLlm>) {
        let db = DecisionDb::in_memory().unwrap();
        let docs = [
            ("BO2024_10_D1_A.txt", "Nr. 10/C3/501 din 05.03.2024\nCerința de experiență similară este restrictivă."),
            ("BO2024_11_R2_R.txt", "Nr. 11/C5/502 din 06.03.2024\nOferta a fost respinsă ca neconformă, experiență similară insuficientă."),
        ];
        for (name, text) in docs {
            db.insert_decision(&parse_decision_text(text, Some(name))).unwrap();
        }

        let llm = Arc::new(ScriptedLlm {
            reply: reply.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        });
        let config = RetrievalConfig::default();
        let retriever = DecisionRetriever::new(Arc::new(db), &config);
        (RagService::new(retriever, llm.clone(), config), llm)
    }

    fn chat(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.into(),
            conversation_id: Some("conv-1".into()),
            history: vec![],
        }
    }

    #[tokio::test]
    async fn test_grounded_answer_with_citation() {
        let (rag, llm) = service(Some("Conform deciziei BO2024_10, cerința este restrictivă."));
        let response = rag.chat(chat("Ce spune CNSC despre experiență similară?")).await.unwrap();

        assert!(response.grounded);
        assert_eq!(response.conversation_id, "conv-1");
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].external_id, "BO2024_10");
        assert!(response.citations[0].verified);
        assert!(response.citations[0].text.contains("experiență similară"));
        assert!((response.confidence - 0.4).abs() < 1e-6);

        let prompts = llm.prompts.lock();
        assert!(prompts[0].contains("[Document 2]"));
        assert!(prompts[0].contains("<query>\nCe spune CNSC despre experiență similară?\n</query>"));
    }

    #[tokio::test]
    async fn test_no_matches_is_ungrounded() {
        let (rag, llm) = service(Some("unused"));
        let response = rag.chat(chat("xylofon quartz")).await.unwrap();

        assert!(!response.grounded);
        assert!(response.citations.is_empty());
        assert_eq!(response.confidence, 0.0);
        assert_eq!(response.message, NO_DECISIONS_MESSAGE);
        assert!(llm.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let (rag, _) = service(None);
        let response = rag.chat(chat("experiență similară")).await.unwrap();

        assert!(!response.grounded);
        assert_eq!(response.message, LLM_FALLBACK_MESSAGE);
        assert!(response.citations.is_empty());
        assert!(!response.suggested_questions.is_empty());
    }

    #[tokio::test]
    async fn test_generated_conversation_id() {
        let (rag, _) = service(Some("ok"));
        let mut request = chat("experiență similară");
        request.conversation_id = None;
        let response = rag.chat(request).await.unwrap();
        assert!(Uuid::parse_str(&response.conversation_id).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_chat_request() {
        let (rag, _) = service(Some("ok"));
        assert!(matches!(rag.chat(chat("  ")).await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_memo() {
        let (rag, llm) = service(Some("Memo: BO2024_11 ..."));
        let response = rag
            .memo(MemoRequest {
                topic: "experiență similară".into(),
                max_decisions: 2,
            })
            .await
            .unwrap();

        assert_eq!(response.memo, "Memo: BO2024_11 ...");
        assert_eq!(response.decisions_used, 2);
        assert!((response.confidence - 1.0).abs() < 1e-6);
        assert!(llm.prompts.lock()[0].contains("Generează un memo juridic despre: experiență similară."));
    }

    #[test]
    fn test_suggested_questions() {
        let (rag, _) = service(Some("ok"));
        let decisions = rag.retriever.retrieve("experiență similară", 5).unwrap();
        let questions = suggested_questions(&decisions);

        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0], "Ce jurisprudență există pentru criticile D1, R2?");
        assert_eq!(questions[3], "Arată-mi decizii similare");
        assert_eq!(suggested_questions(&[]), vec!["Arată-mi decizii similare"]);
    }
}
