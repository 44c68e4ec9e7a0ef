mod analysis;
mod config;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod render;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::JSearchClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: both API keys are required
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RecruitifyAI v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.gemini_api_key.clone())
        .context("failed to build Gemini client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let job_search = JSearchClient::new(config.rapidapi_key.clone())
        .context("failed to build JSearch client")?;
    info!("Job search client initialized (host: {})", jobs::JSEARCH_HOST);

    let sessions = SessionStore::with_idle_timeout(config.session_idle_timeout);
    tokio::spawn(sessions.clone().sweep_idle());
    info!(
        "Sessions expire after {}s idle",
        config.session_idle_timeout.as_secs()
    );

    let state = AppState {
        llm: Arc::new(llm),
        job_search: Arc::new(job_search),
        sessions,
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
