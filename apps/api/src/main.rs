mod analysis;
mod config;
mod errors;
mod extraction;
mod interview;
mod models;
mod providers;
mod routes;
mod state;
mod structured;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::providers::cloud::CloudProvider;
use crate::providers::ollama::OllamaProvider;
use crate::providers::router::ProviderRouter;
use crate::providers::CompletionProvider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Assemble the fallback chain in strict order: primary cloud, optional
    // fallback cloud, local inference.
    let mut chain: Vec<Arc<dyn CompletionProvider>> = vec![Arc::new(CloudProvider::groq(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
    ))];
    if let Some(key) = config.openrouter_api_key.clone() {
        chain.push(Arc::new(CloudProvider::openrouter(
            key,
            config.openrouter_model.clone(),
        )));
    }
    chain.push(Arc::new(OllamaProvider::new(
        &config.ollama_host,
        config.ollama_port,
        config.ollama_model.clone(),
    )));

    let router = Arc::new(ProviderRouter::new(
        chain,
        Duration::from_secs(config.request_timeout_secs),
    ));
    info!(chain = ?router.provider_names(), "provider fallback chain initialized");

    let state = AppState { router };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
