//! src/cache/upload_status.rs
//! ============================================================================
//! # Upload Status Cache
//!
//! Memoizes the per-post upload status snapshot so row rendering does not
//! re-query the upload pipeline on every pass. Snapshots are immutable once
//! composed; eviction is selective by post id and recomputation is lazy on
//! the next render pass.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::model::ids::LocalPostId;
use crate::model::post::PostSummary;
use crate::stores::UploadMonitor;

/// Immutable per-post upload status, composed from the upload pipeline's
/// three independent signals: error store, queue state and media progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUploadStatus {
    pub upload_error: Option<compact_str::CompactString>,

    /// Aggregate media upload progress, `0..=100`.
    pub media_upload_progress: u8,

    pub is_uploading: bool,
    pub is_uploading_or_queued: bool,
    pub is_queued: bool,
    pub is_upload_failed: bool,
    pub has_in_progress_media_upload: bool,
    pub has_pending_media_upload: bool,
}

/// Cache of upload status snapshots keyed by local post id.
pub struct UploadStatusCache {
    entries: FxHashMap<LocalPostId, PostUploadStatus>,
    max_entries: usize,
}

impl UploadStatusCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            max_entries,
        }
    }

    /// Cache hit returns the stored snapshot; on miss the snapshot is
    /// composed from the upload monitor and stored.
    pub fn get_or_compute(
        &mut self,
        post: &PostSummary,
        uploads: &dyn UploadMonitor,
    ) -> PostUploadStatus {
        if let Some(status) = self.entries.get(&post.local_id) {
            return status.clone();
        }

        let status = Self::compose(post, uploads);

        // A full cache means the session churned through far more posts than
        // one window holds; dropping everything keeps the next render correct.
        if self.entries.len() >= self.max_entries {
            debug!(
                entries = self.entries.len(),
                "upload status cache at capacity, clearing"
            );
            self.entries.clear();
        }

        self.entries.insert(post.local_id, status.clone());
        status
    }

    /// Evict the listed ids. Does not recompute eagerly; the next render
    /// pass recomputes lazily.
    pub fn invalidate(&mut self, ids: &[LocalPostId]) {
        for id in ids {
            self.entries.remove(id);
        }
    }

    #[must_use]
    pub fn contains(&self, id: LocalPostId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[expect(clippy::cast_possible_truncation, reason = "clamped to 0..=100")]
    #[expect(clippy::cast_sign_loss, reason = "clamped to 0..=100")]
    fn compose(post: &PostSummary, uploads: &dyn UploadMonitor) -> PostUploadStatus {
        let progress: u8 =
            (uploads.media_upload_progress(post).clamp(0.0, 1.0) * 100.0).round() as u8;

        PostUploadStatus {
            upload_error: uploads.upload_error(post),
            media_upload_progress: progress,
            is_uploading: uploads.is_uploading(post),
            is_uploading_or_queued: uploads.is_uploading_or_queued(post),
            is_queued: uploads.is_queued(post),
            is_upload_failed: uploads.is_failed(post),
            has_in_progress_media_upload: uploads.has_in_progress_media_upload(post),
            has_pending_media_upload: uploads.has_pending_media_upload(post),
        }
    }
}

impl std::fmt::Debug for UploadStatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStatusCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
