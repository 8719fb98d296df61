// Candidate extraction pipeline.
// Implements: document loading, chunking, per-document indexing via the
// embedding cache, and retrieval QA over the fixed question list.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod chunker;
pub mod loader;
pub mod pipeline;
pub mod qa;
pub mod questions;
