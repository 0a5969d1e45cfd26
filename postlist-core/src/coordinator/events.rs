//! src/coordinator/events.rs
//! ============================================================================
//! # `PostListEvent`: Inbound Async Completion Signals
//!
//! Every async subsystem reports back through this one tagged union, pushed
//! into the coordinator's event channel and consumed by a single serialized
//! ingestion point. Per-item ordering is preserved by that serialization;
//! the reconciler decides per event whether it is authoritative or stale.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::model::ids::{LocalPostId, RemoteMediaId};
use crate::model::row::DataWindow;

/// The two sub-events of the two-phase remote delete protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    /// The remote accepted the delete; the post is still in local storage.
    Acknowledged,

    /// The post has left local storage. Only now is the delete finished.
    Removed,
}

/// Cause tag of a post-changed completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostChangeCause {
    /// A remote update for the post landed (conflict resolution path).
    Updated { id: LocalPostId },

    Trashed { id: LocalPostId },

    Restored { id: LocalPostId },

    Deleted { id: LocalPostId, phase: DeletePhase },
}

/// Inbound async completion signals, one variant per event kind.
#[derive(Debug, Clone)]
pub enum PostListEvent {
    /// A remote post mutation completed.
    PostChanged {
        cause: PostChangeCause,
        is_error: bool,
    },

    /// A remote post upload finished (success or failure).
    PostUploaded {
        id: LocalPostId,
        site_id: i64,
        is_error: bool,
    },

    /// Media objects changed in the local store (e.g. a fetch completed).
    MediaChanged {
        media_ids: SmallVec<[RemoteMediaId; 4]>,
        is_error: bool,
    },

    /// A media-only upload batch finished, with no post attached. Surfaced
    /// to the user; posts are unaffected, so no cache is touched.
    MediaUploadResult {
        media_ids: SmallVec<[RemoteMediaId; 4]>,
        is_error: bool,
        message: Option<CompactString>,
    },

    /// A media upload finished.
    MediaUploaded {
        media_id: RemoteMediaId,
        post_id: Option<LocalPostId>,
        site_id: i64,
        is_error: bool,
        canceled: bool,
    },

    /// A post upload started; reload so the uploading status appears.
    UploadStarted { id: LocalPostId },

    /// A post upload was canceled (probably due to failed media).
    UploadCanceled { id: LocalPostId },

    /// Media upload progress for a post changed.
    MediaUploadProgress { id: LocalPostId },

    /// Failed media uploads were retried; the affected posts need fresh
    /// upload statuses.
    MediaRetried {
        post_ids: SmallVec<[LocalPostId; 4]>,
    },

    /// Network connectivity changed.
    ConnectivityChanged { is_connected: bool },

    /// The paginated store delivered a new visible window.
    WindowArrived { window: DataWindow },
}
