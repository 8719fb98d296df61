use crate::render_cache::RenderCache;

/// Shared application state injected into route handlers via Axum extractors.
/// The render cache is the only state the web layer ever touches — the
/// pipeline, clients, and config live with the background refresh task.
#[derive(Clone)]
pub struct AppState {
    pub render_cache: RenderCache,
}
