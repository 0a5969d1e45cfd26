//! src/coordinator/scroll.rs
//! ============================================================================
//! # Scroll Coordinator
//!
//! One-shot "scroll to this post once it materializes" state. A request
//! against a window that already holds the row resolves immediately;
//! otherwise the target is remembered and consumed exactly once when the
//! next window arrives, whether or not the row is found in it.

use tracing::warn;

use crate::model::ids::LocalPostId;
use crate::model::row::DataWindow;

#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    pending: Option<LocalPostId>,
}

impl ScrollCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `id` against the current window, or remember it as the
    /// pending target. Returns the index to scroll to, if already known.
    /// Either way the newest request supersedes any earlier pending target.
    pub fn request(&mut self, id: LocalPostId, window: Option<&DataWindow>) -> Option<usize> {
        if let Some(index) = window.and_then(|w| w.position_of(id)) {
            self.pending = None;
            return Some(index);
        }

        self.pending = Some(id);
        None
    }

    /// A new window arrived: consume the pending target unconditionally and
    /// try to locate it. A missing row is non-fatal and never surfaced.
    pub fn on_window(&mut self, window: &DataWindow) -> Option<usize> {
        let id = self.pending.take()?;

        let index = window.position_of(id);
        if index.is_none() {
            warn!(%id, "scroll target not found in new data window");
        }

        index
    }

    #[must_use]
    pub const fn pending(&self) -> Option<LocalPostId> {
        self.pending
    }
}
