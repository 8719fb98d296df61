//! Embedding cache — builds a vector index per document and persists it
//! under `<persist-root>/<stem>`, reusing the persisted copy on every
//! later run.
//!
//! Cache policy is trust-by-existence: if the per-stem directory exists,
//! the persisted index is opened as-is. There is no content fingerprint,
//! no staleness check, and no TTL. Two documents sharing a filename stem
//! therefore share one cache slot — first write sticks.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::chunker::TextChunk;
use crate::index::embedder::{EmbedError, Embedder};
use crate::index::VectorIndex;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    #[error("document produced no chunks to index")]
    EmptyDocument,
}

/// Opens or builds one persisted vector index per document stem.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    persist_root: PathBuf,
}

impl EmbeddingCache {
    pub fn new(persist_root: impl Into<PathBuf>) -> Self {
        Self {
            persist_root: persist_root.into(),
        }
    }

    /// On-disk location of a document's index directory.
    pub fn index_dir(&self, stem: &str) -> PathBuf {
        self.persist_root.join(stem)
    }

    /// Returns the document's vector index, reusing the persisted copy if
    /// its directory exists and building + persisting one otherwise.
    ///
    /// Any failure is logged with the document identity and answered with
    /// `None`; callers must skip the document for this cycle.
    pub async fn open_or_build(
        &self,
        stem: &str,
        chunks: &[TextChunk],
        embedder: &dyn Embedder,
    ) -> Option<VectorIndex> {
        let dir = self.index_dir(stem);
        if dir.exists() {
            return match VectorIndex::load(&dir) {
                Ok(index) => {
                    debug!("reusing persisted index for {stem} ({} chunks)", index.len());
                    Some(index)
                }
                Err(e) => {
                    warn!("failed to open persisted index for {stem}: {e}");
                    None
                }
            };
        }

        match self.build_and_persist(stem, chunks, embedder).await {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("failed to build index for {stem}: {e}");
                None
            }
        }
    }

    async fn build_and_persist(
        &self,
        stem: &str,
        chunks: &[TextChunk],
        embedder: &dyn Embedder,
    ) -> Result<VectorIndex, IndexError> {
        if chunks.is_empty() {
            return Err(IndexError::EmptyDocument);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        let index = VectorIndex::from_embeddings(chunks, embeddings);

        fs::create_dir_all(&self.persist_root)?;

        // Stage into a temp directory and publish with a rename, so the
        // per-stem path never exists in a half-written state. A failure
        // anywhere above leaves no directory a later run would trust.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.persist_root)?;
        index.save(staging.path())?;
        fs::rename(staging.path(), self.index_dir(stem))?;

        debug!("persisted index for {stem} ({} chunks)", index.len());
        Ok(index)
    }
}
