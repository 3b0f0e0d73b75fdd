//! feedmix-ai - Content personalization microservice
//!
//! Holds the ingested item list and rewrites items into social-media posts
//! (text + image) through a generative AI service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use feedmix_common::config::{resolve_config_path, TomlConfig};
use feedmix_common::EventBus;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedmix_ai::config::{gemini_settings, resolve_gemini_api_key};
use feedmix_ai::ingestion::{self, MockFeed};
use feedmix_ai::pipeline::PersonalizationPipeline;
use feedmix_ai::services::{GeminiClient, GeminiImageTransformer, GeminiTextTransformer};
use feedmix_ai::store::ItemStore;
use feedmix_ai::AppState;

/// Command-line arguments for feedmix-ai
#[derive(Parser, Debug)]
#[command(name = "feedmix-ai")]
#[command(about = "Content personalization microservice for feedmix")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "FEEDMIX_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides TOML)
    #[arg(short, long, env = "FEEDMIX_PORT")]
    port: Option<u16>,

    /// Load the built-in feed at startup instead of waiting for POST /feeds/extract
    #[arg(long)]
    extract_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = TomlConfig::load(&config_path)?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("feedmix_ai={0},feedmix_common={0},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting feedmix-ai (Content Personalization) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", config_path.display());
    if !config_path.exists() {
        warn!("Config file missing, running on built-in defaults");
    }

    let api_key = resolve_gemini_api_key(&config)?;
    let client = GeminiClient::new(gemini_settings(&config, api_key))
        .context("Failed to build Gemini client")?;
    info!(
        text_model = %config.text_model,
        image_model = %config.image_model,
        "Generative clients initialized"
    );

    let event_bus = EventBus::new(100);
    let store = ItemStore::new();
    let pipeline = PersonalizationPipeline::new(
        store.clone(),
        Arc::new(GeminiTextTransformer::new(client.clone(), config.text_model.clone())),
        Arc::new(GeminiImageTransformer::new(client, config.image_model.clone())),
        event_bus.clone(),
    );
    let feed = Arc::new(MockFeed::new());

    if args.extract_on_start {
        let count = ingestion::ingest(&store, feed.as_ref(), &event_bus).await?;
        info!("Extracted {} items at startup", count);
    }

    let state = AppState::new(store, pipeline, feed, event_bus);
    let app = feedmix_ai::build_router(state);

    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
