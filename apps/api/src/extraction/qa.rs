//! Retrieval question answering: embed the question, pull the most similar
//! chunks from the document's index, and ask the chat model with the
//! retrieved text stuffed into the prompt.

use async_trait::async_trait;
use thiserror::Error;

use crate::index::embedder::{EmbedError, Embedder};
use crate::index::VectorIndex;
use crate::llm_client::prompts::{build_qa_prompt, QA_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum QaError {
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("embedder returned no vector for the question")]
    MissingQueryVector,
}

/// Chat model capability consumed by retrieval QA. Implemented by
/// `LlmClient`; tests substitute scripted models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.answer(prompt, system).await
    }
}

/// Answers questions against one document's vector index.
pub struct RetrievalQa<'a> {
    index: &'a VectorIndex,
    embedder: &'a dyn Embedder,
    model: &'a dyn ChatModel,
    top_k: usize,
}

impl<'a> RetrievalQa<'a> {
    pub fn new(
        index: &'a VectorIndex,
        embedder: &'a dyn Embedder,
        model: &'a dyn ChatModel,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            model,
            top_k,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<String, QaError> {
        let query = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(QaError::MissingQueryVector)?;

        let hits = self.index.top_k(&query, self.top_k);
        let context = hits
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = build_qa_prompt(&context, question);
        Ok(self.model.complete(QA_SYSTEM, &prompt).await?)
    }
}
