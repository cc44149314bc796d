//! HTTP server for ExpertAP

pub mod routes;
pub mod state;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{Error, Result};
pub use state::AppState;

/// ExpertAP HTTP server
pub struct ExpertApServer {
    state: AppState,
}

impl ExpertApServer {
    /// Open the store and providers described by `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::from_config(config)?,
        })
    }

    /// Wrap already-built state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = router(self.state);

        tracing::info!("Starting ExpertAP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        let server = &self.state.config().server;
        format!("{}:{}", server.host, server.port)
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let server = &state.config().server;
    let enable_cors = server.enable_cors;
    let max_body_size = server.max_body_size;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
        // Middleware layers (order matters - applied bottom to top)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Application info
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "app": "ExpertAP",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config().environment.as_str(),
        "health": "/health",
        "api": "/api/v1",
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app": "ExpertAP",
        "environment": state.config().environment.as_str(),
    }))
}

/// Readiness: the store answers a query
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match state.db() {
        Ok(db) => tokio::task::spawn_blocking(move || db.count())
            .await
            .map_err(Error::from)
            .and_then(|r| r)
            .is_ok(),
        Err(_) => false,
    };

    let llm = match state.llm() {
        Ok(llm) => llm.health_check().await.unwrap_or_else(|e| {
            tracing::warn!(provider = llm.name(), error = %e, "LLM health check failed");
            false
        }),
        Err(_) => false,
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "ready": database,
            "database": database,
            "llm": llm,
        })),
    )
}
