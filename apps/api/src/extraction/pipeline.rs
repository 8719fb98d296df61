//! Candidate extraction pipeline: discover resume documents, drive each
//! through load → chunk → embedding cache → retrieval QA, and collect one
//! `CandidateInfo` per successfully processed document.
//!
//! Failures are strictly per-document: a document that cannot be loaded,
//! indexed, or answered is logged and skipped, never aborting the scan.
//! A skipped document is simply retried on the next scheduled cycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::extraction::chunker::TextChunker;
use crate::extraction::loader::DocumentLoader;
use crate::extraction::qa::{ChatModel, RetrievalQa};
use crate::index::cache::EmbeddingCache;
use crate::index::embedder::Embedder;

/// One asked question and the model's answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Per-document result bundle, keyed by the document's filename stem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateInfo {
    pub candidate_file: String,
    pub questions: Vec<QaPair>,
}

/// Extensions recognized as candidate documents.
const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

pub struct ExtractionPipeline {
    pub loader: Arc<dyn DocumentLoader>,
    pub chunker: TextChunker,
    pub cache: EmbeddingCache,
    pub embedder: Arc<dyn Embedder>,
    pub model: Arc<dyn ChatModel>,
    /// Asked in order; answers are emitted in the same order.
    pub questions: Vec<String>,
    pub top_k: usize,
}

impl ExtractionPipeline {
    /// Scans `docs_root` recursively and returns one record per document
    /// that made it through the whole pipeline, in traversal order.
    pub async fn extract(&self, docs_root: &Path) -> Vec<CandidateInfo> {
        if !docs_root.exists() {
            warn!("candidate folder {} does not exist", docs_root.display());
            return Vec::new();
        }

        let mut results = Vec::new();
        for path in discover_documents(docs_root) {
            if let Some(info) = self.process_document(&path).await {
                results.push(info);
            }
        }
        results
    }

    async fn process_document(&self, path: &Path) -> Option<CandidateInfo> {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("skipping {}: unusable file name", path.display());
            return None;
        };
        info!("processing {}", path.display());

        let pages = match self.loader.load(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("failed to load {}: {e}", path.display());
                return None;
            }
        };

        let chunks = self.chunker.chunk_pages(&pages);
        if chunks.is_empty() {
            warn!("no extractable text in {}", path.display());
            return None;
        }

        let index = self
            .cache
            .open_or_build(stem, &chunks, self.embedder.as_ref())
            .await?;

        let qa = RetrievalQa::new(&index, self.embedder.as_ref(), self.model.as_ref(), self.top_k);
        let mut answered = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            match qa.ask(question).await {
                Ok(answer) => answered.push(QaPair {
                    question: question.clone(),
                    answer,
                }),
                Err(e) => {
                    warn!("question failed for {stem}: {e}");
                    return None;
                }
            }
        }

        Some(CandidateInfo {
            candidate_file: stem.to_string(),
            questions: answered,
        })
    }
}

/// Recursively discovers candidate documents under `root`, in a stable
/// traversal order.
fn discover_documents(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("walk error under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::extraction::loader::{DocumentPage, LoadError};
    use crate::index::embedder::EmbedError;
    use crate::llm_client::LlmError;

    /// Loader keyed by filename stem; unknown stems fail like a parser
    /// would on a corrupt file.
    struct FakeLoader {
        texts: HashMap<String, String>,
    }

    impl FakeLoader {
        fn new(texts: &[(&str, &str)]) -> Self {
            Self {
                texts: texts
                    .iter()
                    .map(|(stem, text)| (stem.to_string(), text.to_string()))
                    .collect(),
            }
        }
    }

    impl DocumentLoader for FakeLoader {
        fn load(&self, path: &Path) -> Result<Vec<DocumentPage>, LoadError> {
            let stem = path.file_stem().unwrap().to_str().unwrap();
            let text = self
                .texts
                .get(stem)
                .ok_or_else(|| LoadError::Io(std::io::Error::other("corrupt document")))?;
            Ok(vec![DocumentPage {
                number: 1,
                text: text.clone(),
            }])
        }
    }

    /// Records every embed batch so tests can tell document indexing
    /// (multi-chunk batches) apart from per-question query embeds.
    struct RecordingEmbedder {
        batches: Mutex<Vec<usize>>,
    }

    impl RecordingEmbedder {
        fn new() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
            }
        }

        fn document_batches(&self) -> usize {
            self.batches.lock().unwrap().iter().filter(|n| **n > 1).count()
        }
    }

    #[async_trait]
    impl Embedder for RecordingEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            self.batches.lock().unwrap().push(inputs.len());
            Ok(inputs
                .iter()
                .map(|text| vec![text.len() as f32, 1.0])
                .collect())
        }
    }

    /// Answers every question with a value derived from it.
    struct ScriptedModel;

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            Ok(format!("answered: {}", prompt.len()))
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"placeholder").unwrap();
    }

    fn pipeline(
        loader: FakeLoader,
        embedder: Arc<RecordingEmbedder>,
        persist_root: &Path,
        questions: &[&str],
    ) -> ExtractionPipeline {
        ExtractionPipeline {
            loader: Arc::new(loader),
            // Small chunks so every test document yields more than one.
            chunker: TextChunker::new(16, 0),
            cache: EmbeddingCache::new(persist_root),
            embedder,
            model: Arc::new(ScriptedModel),
            questions: questions.iter().map(|q| q.to_string()).collect(),
            top_k: 2,
        }
    }

    #[tokio::test]
    async fn test_missing_root_yields_empty_result() {
        let p = pipeline(
            FakeLoader::new(&[]),
            Arc::new(RecordingEmbedder::new()),
            Path::new("/nonexistent/persist"),
            &["q"],
        );
        let results = p.extract(Path::new("/nonexistent/docs")).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_failing_document_does_not_abort_the_batch() {
        let docs = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        touch(docs.path(), "alice.pdf");
        touch(docs.path(), "bob.pdf"); // not in the loader -> load fails
        touch(docs.path(), "carol.docx");

        let loader = FakeLoader::new(&[
            ("alice", "alice is an experienced backend engineer"),
            ("carol", "carol builds mobile apps in kotlin and swift"),
        ]);
        let p = pipeline(
            loader,
            Arc::new(RecordingEmbedder::new()),
            persist.path(),
            &["What is the name of the job candidate?"],
        );

        let results = p.extract(docs.path()).await;

        let stems: Vec<&str> = results.iter().map(|r| r.candidate_file.as_str()).collect();
        assert_eq!(stems, vec!["alice", "carol"], "traversal order, minus the failure");
    }

    #[tokio::test]
    async fn test_answers_preserve_question_order() {
        let docs = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        touch(docs.path(), "dave.pdf");

        let questions = [
            "What is the name of the job candidate?",
            "What are the specialities of this candidate?",
            "Please extract all hyperlinks.",
        ];
        let p = pipeline(
            FakeLoader::new(&[("dave", "dave is a data engineer, see https://dave.dev")]),
            Arc::new(RecordingEmbedder::new()),
            persist.path(),
            &questions,
        );

        let results = p.extract(docs.path()).await;
        assert_eq!(results.len(), 1);

        let asked: Vec<&str> = results[0]
            .questions
            .iter()
            .map(|qa| qa.question.as_str())
            .collect();
        assert_eq!(asked, questions);
        assert!(results[0].questions.iter().all(|qa| !qa.answer.is_empty()));
    }

    #[tokio::test]
    async fn test_document_with_no_text_is_skipped() {
        let docs = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        touch(docs.path(), "ghost.pdf");

        let p = pipeline(
            FakeLoader::new(&[("ghost", "   \n  ")]),
            Arc::new(RecordingEmbedder::new()),
            persist.path(),
            &["q"],
        );

        assert!(p.extract(docs.path()).await.is_empty());
        assert!(!persist.path().join("ghost").exists());
    }

    #[tokio::test]
    async fn test_end_to_end_second_run_is_a_cache_hit() {
        let docs = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        touch(docs.path(), "erin.pdf");

        let embedder = Arc::new(RecordingEmbedder::new());
        let questions = [
            "What is the name of the job candidate?",
            "What are the specialities of this candidate?",
        ];
        let p = pipeline(
            FakeLoader::new(&[(
                "erin",
                "erin is a staff engineer with a decade of distributed systems work",
            )]),
            embedder.clone(),
            persist.path(),
            &questions,
        );

        let first = p.extract(docs.path()).await;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].candidate_file, "erin");
        assert_eq!(first[0].questions.len(), questions.len());
        assert_eq!(embedder.document_batches(), 1);

        // Exactly one stem-named directory under the persist root.
        let entries: Vec<_> = fs::read_dir(persist.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("erin")]);

        let second = p.extract(docs.path()).await;
        assert_eq!(second, first);
        assert_eq!(
            embedder.document_batches(),
            1,
            "second run must reuse the persisted index without re-embedding"
        );
    }

    #[test]
    fn test_discovery_ignores_unrelated_files() {
        let docs = tempfile::tempdir().unwrap();
        touch(docs.path(), "resume.pdf");
        touch(docs.path(), "notes.txt");
        fs::create_dir(docs.path().join("nested")).unwrap();
        touch(&docs.path().join("nested"), "inner.DOCX");

        let found = discover_documents(docs.path());
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"resume.pdf".to_string()));
        assert!(names.contains(&"inner.DOCX".to_string()));
        assert!(!names.iter().any(|n| n.ends_with(".txt")));
    }
}
