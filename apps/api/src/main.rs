mod config;
mod extraction;
mod index;
mod llm_client;
mod refresh;
mod render;
mod render_cache;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::chunker::TextChunker;
use crate::extraction::pipeline::ExtractionPipeline;
use crate::extraction::questions::CANDIDATE_QUESTIONS;
use crate::index::cache::EmbeddingCache;
use crate::index::embedder::OpenAiEmbedder;
use crate::llm_client::LlmClient;
use crate::render_cache::RenderCache;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate extraction API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize embeddings client
    let embedder = OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        &config.embedding_base_url,
        config.embedding_model.clone(),
    );
    info!("Embedder initialized (model: {})", config.embedding_model);

    // Assemble the extraction pipeline around the embedding cache
    let pipeline = Arc::new(ExtractionPipeline {
        loader: Arc::new(extraction::loader::FileLoader),
        chunker: TextChunker::new(config.chunk_size, config.chunk_overlap),
        cache: EmbeddingCache::new(config.persist_root.clone()),
        embedder: Arc::new(embedder),
        model: Arc::new(llm),
        questions: CANDIDATE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        top_k: config.retrieval_top_k,
    });

    // Start the background refresh loop with a shutdown handle
    let render_cache = RenderCache::new();
    let cancel = CancellationToken::new();
    let refresh_task = tokio::spawn(refresh::run(
        pipeline,
        render_cache.clone(),
        config.docs_dir.clone(),
        config.refresh_interval,
        cancel.clone(),
    ));
    info!(
        "Refresh loop started: scanning {} every {:?}",
        config.docs_dir.display(),
        config.refresh_interval
    );

    // Build app state and router
    let state = AppState { render_cache };
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    // Wait for the refresh loop to notice the cancellation and finish its
    // current cycle before exiting.
    let _ = refresh_task.await;

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    cancel.cancel();
}
