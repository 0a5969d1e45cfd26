//! src/stores.rs
//! ============================================================================
//! # External Collaborator Seams
//!
//! Trait boundaries for everything the coordinator talks to but does not
//! implement: the paginated data store, the remote mutation dispatcher, the
//! upload pipeline, media resolution, conflict handling and connectivity.
//! Dispatch methods are fire-and-forget enqueues; completion arrives later
//! through the event channel, never as a return value.

use compact_str::CompactString;

use crate::model::ids::{LocalPostId, RemoteMediaId};
use crate::model::post::PostSummary;

/// Observable signals of the paginated store, sampled per recomputation.
#[derive(Debug, Clone, Default)]
pub struct ListSignals {
    pub is_fetching_first_page: bool,
    pub is_loading_more: bool,
    pub is_empty: bool,

    /// Last refresh error, if the most recent first-page fetch failed.
    pub last_error: Option<CompactString>,
}

/// Remote-backed paginated data store. Owns windowing and page fetching;
/// this crate only triggers coarse reloads and first-page refetches.
pub trait PagedListStore: Send + Sync {
    /// Refetch the first page from the remote.
    fn fetch_first_page(&self);

    /// Coarse invalidation: reload the entire visible window. Rows with
    /// valid cache entries are reused without recomputation.
    fn invalidate_data(&self);

    fn signals(&self) -> ListSignals;
}

/// Local post resolution. Commands on unresolvable ids are silent no-ops.
pub trait PostStore: Send + Sync {
    fn post_by_local_id(&self, id: LocalPostId) -> Option<PostSummary>;
}

/// Remote mutation service. All dispatches are fire-and-forget; the matching
/// completion event carries `{id, cause, is_error}` back to the reconciler.
pub trait RemoteDispatcher: Send + Sync {
    fn dispatch_trash(&self, post: &PostSummary);

    fn dispatch_restore(&self, post: &PostSummary);

    /// Two-phase remote delete: a delete acknowledgment event first, a
    /// separate removal event once the post has left local storage.
    fn dispatch_delete(&self, post: &PostSummary);

    /// Purely local removal for never-synced posts.
    fn dispatch_remove_local(&self, post: &PostSummary);
}

/// Upload pipeline queries and the one explicit cancellation path.
pub trait UploadMonitor: Send + Sync {
    fn upload_error(&self, post: &PostSummary) -> Option<CompactString>;

    fn is_uploading(&self, post: &PostSummary) -> bool;

    fn is_queued(&self, post: &PostSummary) -> bool;

    fn is_uploading_or_queued(&self, post: &PostSummary) -> bool;

    fn is_failed(&self, post: &PostSummary) -> bool;

    /// Aggregate media upload progress, `0.0..=1.0`.
    fn media_upload_progress(&self, post: &PostSummary) -> f32;

    fn has_in_progress_media_upload(&self, post: &PostSummary) -> bool;

    fn has_pending_media_upload(&self, post: &PostSummary) -> bool;

    /// Unlink a queued post from auto-uploading once its media finish; the
    /// media uploads themselves keep running. Used when re-entering edit.
    fn cancel_queued_post_upload(&self, id: LocalPostId);
}

/// Media item as known to the local media store.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub media_id: RemoteMediaId,

    /// Some media is known locally but still missing its URL.
    pub url: Option<String>,
}

/// Media resolution: local lookup plus an async fetch dispatch for media the
/// store does not know yet.
pub trait MediaStore: Send + Sync {
    fn lookup_local_media(&self, id: RemoteMediaId) -> Option<MediaItem>;

    /// Fire-and-forget fetch; a media-changed event primes the cache later.
    fn dispatch_fetch(&self, id: RemoteMediaId);
}

/// Remote/local divergence handling. Editing defers to resolution first.
pub trait ConflictResolver: Send + Sync {
    fn has_unhandled_conflict(&self, post: &PostSummary) -> bool;

    /// Ask the host to walk the user through resolving the conflict.
    fn request_resolution(&self, post: &PostSummary);

    /// A remote update for a post landed successfully.
    fn on_post_updated(&self, id: LocalPostId);
}

/// Connectivity pre-check for mutating commands.
pub trait Connectivity: Send + Sync {
    fn is_network_available(&self) -> bool;
}
