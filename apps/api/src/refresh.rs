//! Background refresh loop: re-runs the extraction pipeline on a fixed
//! interval and publishes the rendered result to the shared cache.
//!
//! The loop alternates between running a cycle and sleeping, forever,
//! until its cancellation token fires. Per-document errors are absorbed
//! inside the pipeline; nothing a cycle does can terminate the loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::extraction::pipeline::ExtractionPipeline;
use crate::render::render_candidate_infos;
use crate::render_cache::RenderCache;

pub async fn run(
    pipeline: Arc<ExtractionPipeline>,
    cache: RenderCache,
    docs_root: PathBuf,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        run_cycle(&pipeline, &cache, &docs_root).await;

        tokio::select! {
            // Shutdown wins over starting another sleep when both are ready.
            biased;
            _ = cancel.cancelled() => {
                info!("refresh loop stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// One full cycle: extract, render, publish. Publishing is a whole-value
/// swap, so readers mid-cycle keep seeing the previous content.
pub async fn run_cycle(pipeline: &ExtractionPipeline, cache: &RenderCache, docs_root: &Path) {
    let started = Instant::now();
    let candidate_infos = pipeline.extract(docs_root).await;
    cache.store(render_candidate_infos(&candidate_infos));
    info!(
        "updated candidate analysis: {} documents in {:.1?}",
        candidate_infos.len(),
        started.elapsed()
    );
}
