//! Application state for the ExpertAP server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::providers::{self, LlmProvider};
use crate::retrieval::DecisionRetriever;
use crate::services::{RagService, RedFlagsAnalyzer};
use crate::storage::DecisionDb;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Decision store; `None` when started with `SKIP_DB_INIT`
    db: Option<Arc<DecisionDb>>,
    /// LLM provider; `None` when no API key is configured
    llm: Option<Arc<dyn LlmProvider>>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        config: AppConfig,
        db: Option<Arc<DecisionDb>>,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db, llm }),
        }
    }

    /// Open the store and build the LLM provider as configured
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let db = if config.database.skip_init {
            tracing::warn!("SKIP_DB_INIT set; decision endpoints will return 503");
            None
        } else {
            let db = DecisionDb::open(&config.database)?;
            tracing::info!(decisions = db.count()?, "decision store opened");
            Some(Arc::new(db))
        };

        let llm = providers::from_config(&config.llm)?;
        if let Some(llm) = &llm {
            tracing::info!(provider = llm.name(), model = llm.model(), "LLM provider initialized");
        }

        Ok(Self::new(config, db, llm))
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Decision store, or 503 when it was never opened
    pub fn db(&self) -> Result<Arc<DecisionDb>> {
        self.inner.db.clone().ok_or(Error::DatabaseDisabled)
    }

    /// LLM provider, or 503 when no key is configured
    pub fn llm(&self) -> Result<Arc<dyn LlmProvider>> {
        self.inner
            .llm
            .clone()
            .ok_or_else(|| Error::llm("LLM provider is not configured (GEMINI_API_KEY missing)"))
    }

    pub fn retriever(&self) -> Result<DecisionRetriever> {
        Ok(DecisionRetriever::new(self.db()?, &self.inner.config.retrieval))
    }

    /// Chat/memo service over the store and the LLM
    pub fn rag(&self) -> Result<RagService> {
        Ok(RagService::new(
            self.retriever()?,
            self.llm()?,
            self.inner.config.retrieval.clone(),
        ))
    }

    /// Red-flag analyzer; jurisprudence lookup is skipped when the store is absent
    pub fn red_flags(&self) -> Result<RedFlagsAnalyzer> {
        if !self.inner.config.features.red_flags_detector {
            return Err(Error::FeatureDisabled("red_flags_detector".to_string()));
        }
        let retriever = self.retriever().ok();
        Ok(RedFlagsAnalyzer::new(retriever, self.llm()?))
    }
}
