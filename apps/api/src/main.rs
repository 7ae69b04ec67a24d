use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studyhub::config::Config;
use studyhub::llm_client::transport::ReqwestTransport;
use studyhub::llm_client::LlmClient;
use studyhub::routes::build_router;
use studyhub::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StudyHub API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let transport = ReqwestTransport::new(config.gemini_api_key.clone()).context("Failed to build HTTP client")?;
    let llm = LlmClient::new(Arc::new(transport), config.generate_content_url());
    info!("LLM client initialized (model: {})", config.gemini_model);

    let state = AppState {
        llm,
        config: config.clone(),
    };

    // The browser client is served from another origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
