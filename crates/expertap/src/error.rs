//! Error types for ExpertAP

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for ExpertAP operations
pub type Result<T> = std::result::Result<T, Error>;

/// ExpertAP errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Decision not found
    #[error("Decision not found: {0}")]
    NotFound(String),

    /// Decision already stored
    #[error("Decision already exists: {0}")]
    Conflict(String),

    /// Relational store error
    #[error("Database error: {0}")]
    Database(String),

    /// Gemini/LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Decision or document parsing error
    #[error("Failed to parse '{source_name}': {message}")]
    Parse { source_name: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Server was started without a decision store
    #[error("Database is not initialized")]
    DatabaseDisabled,

    /// Feature switched off in configuration
    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a parse error
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Blocking task failed: {}", err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            Error::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Decision not found: {}", id),
            ),
            Error::Conflict(id) => (
                StatusCode::CONFLICT,
                "conflict",
                format!("Decision already exists: {}", id),
            ),
            Error::Database(msg) => {
                tracing::error!(error = %msg, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database operation failed".to_string(),
                )
            }
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Parse { .. } => (StatusCode::BAD_REQUEST, "parse_error", self.to_string()),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!(
                    "Tip de fișier nesuportat: {}. Tipuri acceptate: PDF, TXT, MD",
                    ext
                ),
            ),
            Error::DatabaseDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "database_disabled",
                "Database is not initialized".to_string(),
            ),
            Error::FeatureDisabled(name) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "feature_disabled",
                format!("Feature disabled: {}", name),
            ),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
