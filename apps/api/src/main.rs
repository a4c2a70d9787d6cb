mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, TextGeneration};
use crate::pipeline::analyzer::LlmDocumentAnalyzer;
use crate::pipeline::coordinator::InterviewCoordinator;
use crate::pipeline::formatter::LlmResponseFormatter;
use crate::pipeline::quality::LlmQualityAssessor;
use crate::pipeline::questions::LlmQuestionGenerator;
use crate::pipeline::tips::LlmAnswerTipsGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Module paths use underscores, not the hyphenated package name.
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // One service client shared by every pipeline component
    let service: Arc<dyn TextGeneration> = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.generation_model.clone(),
    ));
    info!("LLM client initialized (model: {})", config.generation_model);

    let coordinator = Arc::new(InterviewCoordinator::new(
        Arc::new(LlmDocumentAnalyzer::new(service.clone())),
        Arc::new(LlmQuestionGenerator::new(service.clone())),
        Arc::new(LlmAnswerTipsGenerator::new(service.clone())),
        Arc::new(LlmQualityAssessor::new(service.clone())),
        Arc::new(LlmResponseFormatter::new(service)),
    ));

    let state = AppState {
        coordinator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
