//! ExpertAP server binary
//!
//! Run with: cargo run -p expertap --bin expertap-server

use expertap::{config::AppConfig, server::ExpertApServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expertap=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Environment: {}", config.environment.as_str());
    tracing::info!("  - Database: {}", config.database.url);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Red flags detector: {}", config.features.red_flags_detector);

    let server = ExpertApServer::new(config)?;

    println!("\nExpertAP starting...");
    println!("  API: http://{}/api/v1", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET  /api/v1/decisions          - List decisions");
    println!("  GET  /api/v1/decisions/:id      - Decision details");
    println!("  POST /api/v1/chat               - Ask about CNSC jurisprudence");
    println!("  POST /api/v1/ragmemo            - Generate a legal memo");
    println!("  POST /api/v1/redflags           - Analyze procurement documentation");
    println!("  POST /api/v1/documents/analyze  - Extract document text");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
