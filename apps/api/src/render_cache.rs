use std::sync::{Arc, PoisonError, RwLock};

/// Shown until the first refresh cycle publishes real content.
pub const PLACEHOLDER_HTML: &str = "<p>Processing, please wait ...</p>";

/// Single-slot cache for the latest rendered candidate HTML.
///
/// One writer (the background refresh loop), any number of readers (the
/// request handlers). The slot is only ever replaced wholesale, so a
/// reader sees either the previous complete value or the new one, never
/// a partial write. The lock guards nothing but the pointer swap and is
/// never held across an await point.
#[derive(Clone)]
pub struct RenderCache {
    slot: Arc<RwLock<Arc<str>>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::from(PLACEHOLDER_HTML))),
        }
    }

    /// Current content. Cheap: clones the inner `Arc`, not the string.
    pub fn load(&self) -> Arc<str> {
        // A poisoned lock still holds a complete value (whole-value swap),
        // so it is safe to read through.
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the content wholesale.
    pub fn store(&self, html: String) {
        let next: Arc<str> = Arc::from(html);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}
