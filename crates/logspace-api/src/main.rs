use logspace_api::{app, config::ServerConfig, state::AppState};
use logspace_rag::{EmbeddingProvider, RagProcessor};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    //logging setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading configuration...");
    let config = ServerConfig::load()?;
    info!(
        root = %config.logspace_root.display(),
        chunk_size = config.chunking.chunk_size,
        overlap = config.chunking.overlap,
        "Configuration loaded"
    );

    // Index storage directory
    std::fs::create_dir_all(&config.index_dir)?;
    info!(index_dir = %config.index_dir.display(), "Index directory ready");

    // Load embedding backend (fails fast if the model cannot be loaded)
    info!(mode = %config.embedding.mode, model = %config.embedding.model, "Setting up embedding provider...");
    let settings = config.embedding.clone();
    let provider = tokio::task::spawn_blocking(move || EmbeddingProvider::from_settings(&settings)).await??;
    let processor = RagProcessor::new(Arc::new(provider));
    info!("RAG processor ready!");

    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, processor));

    // Server start
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
