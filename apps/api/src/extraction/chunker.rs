use serde::{Deserialize, Serialize};

use crate::extraction::loader::DocumentPage;

/// A bounded span of document text, the unit of embedding and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    /// Page the chunk was cut from (1-based).
    pub page: usize,
}

/// Splits page text into fixed-size chunks measured in characters, with
/// optional overlap between consecutive chunks. Chunks never span pages.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Overlap is clamped below the chunk size so the window always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_pages(&self, pages: &[DocumentPage]) -> Vec<TextChunk> {
        pages
            .iter()
            .flat_map(|page| self.chunk_text(&page.text, page.number))
            .collect()
    }

    pub fn chunk_text(&self, text: &str, page: usize) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim();
            if !piece.is_empty() {
                chunks.push(TextChunk {
                    text: piece.to_string(),
                    page,
                });
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::new(100, 0);
        let chunks = chunker.chunk_text("short resume text", 1);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short resume text");
        assert_eq!(chunks[0].page, 1);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let chunker = TextChunker::new(10, 0);
        let text = "a".repeat(25);
        let chunks = chunker.chunk_text(&text, 1);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
        assert_eq!(chunks[2].text.chars().count(), 5);
    }

    #[test]
    fn test_overlap_repeats_tail_of_previous_chunk() {
        let chunker = TextChunker::new(6, 2);
        let chunks = chunker.chunk_text("abcdefghij", 1);
        assert_eq!(chunks[0].text, "abcdef");
        assert!(chunks[1].text.starts_with("ef"));
    }

    #[test]
    fn test_overlap_clamped_below_chunk_size() {
        // Would loop forever without the clamp.
        let chunker = TextChunker::new(4, 10);
        let chunks = chunker.chunk_text("abcdefgh", 1);
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn test_whitespace_only_text_yields_nothing() {
        let chunker = TextChunker::new(10, 0);
        assert!(chunker.chunk_text("   \n\n  ", 1).is_empty());
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let chunker = TextChunker::new(4, 0);
        let chunks = chunker.chunk_text("héllö wörld", 1);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 4));
    }

    #[test]
    fn test_chunk_pages_keeps_page_numbers() {
        let chunker = TextChunker::new(100, 0);
        let pages = vec![
            DocumentPage {
                number: 1,
                text: "first page".to_string(),
            },
            DocumentPage {
                number: 2,
                text: "second page".to_string(),
            },
        ];
        let chunks = chunker.chunk_pages(&pages);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks[1].page, 2);
    }
}
