use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the two API keys are required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub openai_api_key: String,
    /// Chat model used for retrieval question answering.
    pub llm_model: String,
    /// Embedding model used to vectorize chunks and questions.
    pub embedding_model: String,
    /// Base URL of the OpenAI-compatible embeddings endpoint.
    pub embedding_base_url: String,
    /// Folder scanned recursively for candidate documents.
    pub docs_dir: PathBuf,
    /// Directory holding one persisted vector index per document stem.
    pub persist_root: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub retrieval_top_k: usize,
    /// Delay between background refresh cycles.
    pub refresh_interval: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            llm_model: env_or("LLM_MODEL", "claude-sonnet-4-5"),
            embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            docs_dir: PathBuf::from(env_or("DOCS_DIR", ".")),
            persist_root: PathBuf::from(env_or("PERSIST_ROOT", "embedding_store")),
            chunk_size: env_parse("CHUNK_SIZE", 2000)?,
            chunk_overlap: env_parse("CHUNK_OVERLAP", 0)?,
            retrieval_top_k: env_parse("RETRIEVAL_TOP_K", 4)?,
            refresh_interval: Duration::from_secs(env_parse("REFRESH_INTERVAL_SECS", 600)?),
            port: env_parse("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
