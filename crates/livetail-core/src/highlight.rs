//! Transient highlight tracking for newly arrived entries.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::trace;

/// How long a freshly arrived entry stays flagged for emphasis.
pub const DEFAULT_HIGHLIGHT_WINDOW: Duration = Duration::from_millis(1000);

/// Tracks which entry ids arrived within the highlight window.
///
/// `mark_new` schedules one independent removal task per id; each task
/// only removes its own id, so concurrently expiring ids never interfere.
/// `clear` empties the set immediately and pending removals fire as
/// no-ops. Removal of an id that is already absent is a no-op.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    ids: Arc<Mutex<HashSet<String>>>,
    window: Duration,
}

impl HighlightTracker {
    /// Create a tracker whose marks expire after `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            ids: Arc::new(Mutex::new(HashSet::new())),
            window,
        }
    }

    /// Flag `id` as newly arrived and schedule its expiry.
    pub fn mark_new(&self, id: String) {
        self.ids.lock().unwrap().insert(id.clone());

        let ids = Arc::clone(&self.ids);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if ids.lock().unwrap().remove(&id) {
                trace!(%id, "highlight expired");
            }
        });
    }

    /// Whether `id` is still inside its highlight window.
    pub fn is_new(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }

    /// An owned copy of the currently flagged ids.
    pub fn snapshot(&self) -> HashSet<String> {
        self.ids.lock().unwrap().clone()
    }

    /// Unflag everything immediately.
    pub fn clear(&self) {
        self.ids.lock().unwrap().clear();
    }
}

impl Default for HighlightTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_WINDOW)
    }
}
