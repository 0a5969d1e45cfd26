//! src/coordinator/critical_tracker.rs
//! ============================================================================
//! # Critical Action Tracker
//!
//! At most one in-flight critical action (trash/restore/delete) per post.
//! The tracker is the arbiter for completion events: an event whose action
//! does not match the tracked entry is stale or superseded and must be
//! dropped. Every structural change notifies the injected listener, which
//! triggers a coarse reload of the visible window, so entry add/remove is
//! always paired with a visible-state refresh.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::model::ids::LocalPostId;

/// Mutating operation treated as exclusive per post while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalAction {
    Trashing,
    Restoring,
    Deleting,
}

impl std::fmt::Display for CriticalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &str = match self {
            Self::Trashing => "trash",
            Self::Restoring => "restore",
            Self::Deleting => "delete",
        };

        write!(f, "{s}")
    }
}

/// Invalidation callback fired on every structural change.
pub type InvalidationListener = Arc<dyn Fn() + Send + Sync>;

/// Mapping post id → in-flight critical action.
pub struct CriticalActionTracker {
    actions: FxHashMap<LocalPostId, CriticalAction>,
    listener: InvalidationListener,
}

impl CriticalActionTracker {
    #[must_use]
    pub fn new(listener: InvalidationListener) -> Self {
        Self {
            actions: FxHashMap::default(),
            listener,
        }
    }

    /// Record `action` for `id`, overwriting any prior entry. Returns the
    /// replaced action, if one existed (diagnostic only): an overwrite means
    /// a completion event for the prior attempt is still in flight and will
    /// be classified stale when it lands.
    pub fn add(&mut self, id: LocalPostId, action: CriticalAction) -> Option<CriticalAction> {
        let previous = self.actions.insert(id, action);

        if let Some(prior) = previous {
            warn!(%id, %prior, new = %action, "overwriting tracked critical action");
        } else {
            debug!(%id, %action, "tracking critical action");
        }

        (self.listener)();
        previous
    }

    #[must_use]
    pub fn get(&self, id: LocalPostId) -> Option<CriticalAction> {
        self.actions.get(&id).copied()
    }

    /// Remove the entry **only if** the current value equals `expected`.
    /// The equality guard is the defense against out-of-order completion
    /// events for the same post. Returns whether an entry was removed.
    pub fn remove(&mut self, id: LocalPostId, expected: CriticalAction) -> bool {
        if self.actions.get(&id) != Some(&expected) {
            return false;
        }

        self.actions.remove(&id);
        debug!(%id, action = %expected, "cleared critical action");
        (self.listener)();
        true
    }

    /// Marks "performing critical action" during rendering; disables the
    /// row's destructive buttons.
    #[must_use]
    pub fn contains(&self, id: LocalPostId) -> bool {
        self.actions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for CriticalActionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriticalActionTracker")
            .field("actions", &self.actions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tracker() -> (CriticalActionTracker, Arc<AtomicUsize>) {
        let invalidations = Arc::new(AtomicUsize::new(0));
        let counter = invalidations.clone();
        let tracker = CriticalActionTracker::new(Arc::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        (tracker, invalidations)
    }

    #[test]
    fn test_contains_until_matching_remove() {
        let (mut tracker, _) = tracker();
        let id = LocalPostId(42);

        assert!(tracker.add(id, CriticalAction::Trashing).is_none());
        assert!(tracker.contains(id));

        assert!(tracker.remove(id, CriticalAction::Trashing));
        assert!(!tracker.contains(id));
    }

    #[test]
    fn test_mismatched_remove_is_noop() {
        let (mut tracker, _) = tracker();
        let id = LocalPostId(7);

        tracker.add(id, CriticalAction::Restoring);

        assert!(!tracker.remove(id, CriticalAction::Trashing));
        assert!(tracker.contains(id));
        assert_eq!(tracker.get(id), Some(CriticalAction::Restoring));
    }

    #[test]
    fn test_add_overwrites_and_returns_prior() {
        let (mut tracker, _) = tracker();
        let id = LocalPostId(3);

        tracker.add(id, CriticalAction::Trashing);
        let prior = tracker.add(id, CriticalAction::Deleting);

        assert_eq!(prior, Some(CriticalAction::Trashing));
        assert_eq!(tracker.get(id), Some(CriticalAction::Deleting));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_listener_fires_on_structural_change_only() {
        let (mut tracker, invalidations) = tracker();
        let id = LocalPostId(1);

        tracker.add(id, CriticalAction::Trashing);
        assert_eq!(invalidations.load(Ordering::Relaxed), 1);

        // Guard rejects: no structural change, no listener call.
        tracker.remove(id, CriticalAction::Deleting);
        assert_eq!(invalidations.load(Ordering::Relaxed), 1);

        tracker.remove(id, CriticalAction::Trashing);
        assert_eq!(invalidations.load(Ordering::Relaxed), 2);
    }
}
