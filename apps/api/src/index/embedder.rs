//! Embedding capability — trait seam plus the OpenAI-compatible client.
//!
//! The pipeline and cache only ever see `Arc<dyn Embedder>`, so tests can
//! swap in deterministic fakes without any network access.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding count mismatch: sent {sent} inputs, got {got} vectors")]
    CountMismatch { sent: usize, got: usize },
}

/// Turns text into embedding vectors. The sole entry point for the
/// embedding model capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds every input, returning one vector per input in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

/// Embeddings client for OpenAI-compatible `/embeddings` endpoints.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }

    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let mut last_error: Option<EmbedError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbedError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("embedding API returned {}: {}", status, body);
                last_error = Some(EmbedError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbedError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let mut parsed: EmbeddingResponse = response.json().await?;
            parsed.data.sort_by_key(|entry| entry.index);

            if parsed.data.len() != inputs.len() {
                return Err(EmbedError::CountMismatch {
                    sent: inputs.len(),
                    got: parsed.data.len(),
                });
            }

            debug!("embedded {} inputs (model: {})", inputs.len(), self.model);

            return Ok(parsed.data.into_iter().map(|e| e.embedding).collect());
        }

        Err(last_error.unwrap_or(EmbedError::Api {
            status: 429,
            message: format!("rate limited after {MAX_RETRIES} retries"),
        }))
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        self.request(inputs).await
    }
}
