//! Per-document vector index: embedded chunks persisted as JSON, queried
//! in memory with cosine similarity.

pub mod cache;
pub mod embedder;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extraction::chunker::TextChunk;
use crate::index::cache::IndexError;

/// File holding the serialized index inside its per-document directory.
pub const INDEX_FILE: &str = "index.json";

/// A chunk together with its embedding vector, as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    /// Page the chunk originated from (1-based).
    pub page: usize,
    pub embedding: Vec<f32>,
}

/// Similarity-searchable index over one document's chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Pairs chunks with their embeddings. Both sequences must come from
    /// the same embed call, in the same order.
    pub fn from_embeddings(chunks: &[TextChunk], embeddings: Vec<Vec<f32>>) -> Self {
        let chunks = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk {
                text: chunk.text.clone(),
                page: chunk.page,
                embedding,
            })
            .collect();
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the `k` chunks most similar to the query vector, best first.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<&IndexedChunk> {
        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(query, &chunk.embedding), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }

    /// Reads a persisted index from its directory.
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let raw = fs::read_to_string(dir.join(INDEX_FILE))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the index into `dir`, which must already exist.
    pub fn save(&self, dir: &Path) -> Result<(), IndexError> {
        let raw = serde_json::to_string(self)?;
        fs::write(dir.join(INDEX_FILE), raw)?;
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, page: usize) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            page,
        }
    }

    #[test]
    fn test_top_k_orders_by_similarity() {
        let chunks = vec![chunk("north", 1), chunk("east", 1), chunk("northeast", 2)];
        let embeddings = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.7, 0.7],
        ];
        let index = VectorIndex::from_embeddings(&chunks, embeddings);

        let hits = index.top_k(&[0.0, 1.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "north");
        assert_eq!(hits[1].text, "northeast");
    }

    #[test]
    fn test_top_k_with_k_larger_than_index() {
        let chunks = vec![chunk("only", 1)];
        let index = VectorIndex::from_embeddings(&chunks, vec![vec![1.0, 0.0]]);
        assert_eq!(index.top_k(&[1.0, 0.0], 10).len(), 1);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![chunk("hello", 1), chunk("world", 2)];
        let index =
            VectorIndex::from_embeddings(&chunks, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        index.save(dir.path()).unwrap();

        let reloaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(reloaded, index);
    }
}
