//! Configuration for ExpertAP
//!
//! Values come from three layers, later layers winning:
//! built-in defaults, an optional TOML file named by `EXPERTAP_CONFIG`,
//! and plain environment variables (`PORT`, `DATABASE_URL`, `GEMINI_API_KEY`, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "EXPERTAP_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Server configuration
    pub server: ServerConfig,
    /// Decision store configuration
    pub database: DatabaseConfig,
    /// Gemini/LLM configuration
    pub llm: LlmConfig,
    /// Retrieval and grounding parameters
    pub retrieval: RetrievalConfig,
    /// Feature flags
    pub features: FeatureFlags,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("Unknown ENVIRONMENT: {}", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes (base64 uploads included)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_body_size: 25 * 1024 * 1024, // 25MB
        }
    }
}

/// Decision store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite://path`, a plain filesystem path, or `:memory:`
    pub url: String,
    /// Start the server without opening the store
    pub skip_init: bool,
    /// Files committed per import transaction
    pub import_batch_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            skip_init: false,
            import_batch_size: 100,
        }
    }
}

fn default_database_url() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("expertap").join("expertap.db"))
        .unwrap_or_else(|| PathBuf::from("./data/expertap.db"))
        .to_string_lossy()
        .into_owned()
}

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseConfig {
    /// Resolve the configured URL to a concrete location
    pub fn location(&self) -> Result<DatabaseLocation> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::Config("DATABASE_URL is empty".to_string()));
        }
        if url == ":memory:" || url == "sqlite::memory:" {
            return Ok(DatabaseLocation::Memory);
        }
        if let Some(path) = url.strip_prefix("sqlite://") {
            return Ok(DatabaseLocation::File(PathBuf::from(path)));
        }
        if url.contains("://") {
            return Err(Error::Config(format!(
                "Unsupported database URL scheme: {}",
                url.split("://").next().unwrap_or_default()
            )));
        }
        Ok(DatabaseLocation::File(PathBuf::from(url)))
    }
}

/// Gemini/LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Google AI Studio API key; no key means no LLM
    pub api_key: Option<String>,
    /// Generation model
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Retrieval and grounding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Decisions retrieved per chat question
    pub max_decisions: usize,
    /// Characters of decision text placed in the prompt
    pub context_chars: usize,
    /// Minimum trigram similarity for the fallback search
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_decisions: 5,
            context_chars: 1500,
            similarity_threshold: 0.3,
        }
    }
}

/// Feature flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Expose `POST /api/v1/redflags`
    pub red_flags_detector: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            red_flags_detector: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional TOML file and process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML configuration text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))
    }

    /// Apply environment-style overrides read through `get`
    pub fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(flag) = get("SKIP_DB_INIT") {
            self.database.skip_init = parse_bool("SKIP_DB_INIT", &flag)?;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.llm.model = model;
        }
        if let Some(secs) = get("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid LLM_TIMEOUT_SECS: {}", secs)))?;
        }
        if let Some(flag) = get("ENABLE_RED_FLAGS_DETECTOR") {
            self.features.red_flags_detector = parse_bool("ENABLE_RED_FLAGS_DETECTOR", &flag)?;
        }
        if let Some(env) = get("ENVIRONMENT") {
            self.environment = env.parse()?;
        }

        self.validate()
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.max_decisions == 0 {
            return Err(Error::Config("retrieval.max_decisions must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.retrieval.similarity_threshold) {
            return Err(Error::Config(
                "retrieval.similarity_threshold must be within 0.0..=1.0".into(),
            ));
        }
        if self.database.import_batch_size == 0 {
            return Err(Error::Config("database.import_batch_size must be at least 1".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("Invalid boolean for {}: {}", key, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.retrieval.max_decisions, 5);
        assert_eq!(config.retrieval.context_chars, 1500);
        assert!(config.features.red_flags_detector);
        assert!(config.llm.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(overrides(&[
                ("PORT", "9090"),
                ("DATABASE_URL", "sqlite:///tmp/x.db"),
                ("GEMINI_API_KEY", "k"),
                ("SKIP_DB_INIT", "true"),
                ("ENABLE_RED_FLAGS_DETECTOR", "0"),
                ("ENVIRONMENT", "production"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.database.location().unwrap(),
            DatabaseLocation::File(PathBuf::from("/tmp/x.db"))
        );
        assert_eq!(config.llm.api_key.as_deref(), Some("k"));
        assert!(config.database.skip_init);
        assert!(!config.features.red_flags_detector);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let mut config = AppConfig::default();
        let err = config.apply_overrides(overrides(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(overrides(&[("SKIP_DB_INIT", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_database_location() {
        let mut db = DatabaseConfig::default();
        db.url = ":memory:".into();
        assert_eq!(db.location().unwrap(), DatabaseLocation::Memory);

        db.url = "postgresql://localhost/expertap".into();
        assert!(db.location().is_err());

        db.url = "data/decisions.db".into();
        assert_eq!(
            db.location().unwrap(),
            DatabaseLocation::File(PathBuf::from("data/decisions.db"))
        );
    }

    #[test]
    fn test_toml_partial() {
        let config = AppConfig::from_toml_str(
            r#"
            environment = "staging"

            [server]
            port = 8123

            [retrieval]
            max_decisions = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.retrieval.max_decisions, 8);
        assert_eq!(config.retrieval.context_chars, 1500);
    }
}
