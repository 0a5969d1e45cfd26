//! src/coordinator/orchestrator.rs
//! ============================================================================
//! # `PostListCoordinator`: Mutation Orchestrator
//!
//! Owns every piece of mutable coordination state for one list session (one
//! site, one status filter): the critical action tracker, the derived
//! caches, the scroll target and the one-shot UI channels. User commands
//! enter here; each records intent, dispatches a fire-and-forget remote
//! command and returns without blocking. The eventual completion event
//! drives the terminal transition through the reconciler.
//!
//! Confirmation prompts (publish, delete, conflict dialogs) are the host's
//! job; commands here assume the user already confirmed.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::featured_image::FeaturedImageCache;
use crate::cache::upload_status::UploadStatusCache;
use crate::config::Config;
use crate::coordinator::critical_tracker::{CriticalAction, CriticalActionTracker};
use crate::coordinator::scroll::ScrollCoordinator;
use crate::error::PostListError;
use crate::model::ids::{LocalPostId, RemoteMediaId};
use crate::model::post::PostSummary;
use crate::model::row::{DataWindow, PostListViewState, PostRowState, derive_view_state};
use crate::stores::{
    ConflictResolver, Connectivity, MediaStore, PagedListStore, PostStore, RemoteDispatcher,
    UploadMonitor,
};
use crate::ui::actions::{
    PostListAction, PostUploadAction, SnackbarMessage, ToastMessage, UiChannels, UiReceivers,
    UndoAction,
};

pub(crate) const NOTICE_NO_NETWORK: &str = "No network connection";
pub(crate) const NOTICE_TRASH_FAILED: &str = "Error moving post to trash";
pub(crate) const NOTICE_RESTORE_FAILED: &str = "Error restoring post";
pub(crate) const NOTICE_DELETE_FAILED: &str = "Error deleting post";
pub(crate) const NOTICE_POST_TRASHED: &str = "Post moved to trash";
pub(crate) const NOTICE_POST_RESTORED: &str = "Post restored";
pub(crate) const NOTICE_POST_TRASHING: &str = "Trashing post";
pub(crate) const NOTICE_POST_RESTORING: &str = "Restoring post";

/// Injected external collaborators. The coordinator
/// owns no transport, storage or rendering of its own.
#[derive(Clone)]
pub struct Collaborators {
    pub paged: Arc<dyn PagedListStore>,
    pub posts: Arc<dyn PostStore>,
    pub remote: Arc<dyn RemoteDispatcher>,
    pub uploads: Arc<dyn UploadMonitor>,
    pub media: Arc<dyn MediaStore>,
    pub conflicts: Arc<dyn ConflictResolver>,
    pub connectivity: Arc<dyn Connectivity>,
}

/// Mutation coordinator for one list session. All mutation goes through
/// `&mut self`, serialized by the owning event loop.
pub struct PostListCoordinator {
    site_id: i64,
    config: Config,
    collab: Collaborators,

    pub(crate) tracker: CriticalActionTracker,
    pub(crate) upload_statuses: UploadStatusCache,
    pub(crate) featured_images: FeaturedImageCache,
    pub(crate) scroll: ScrollCoordinator,

    /// Latest visible window, used for immediate scroll resolution.
    pub(crate) current_window: Option<DataWindow>,

    pub(crate) ui: UiChannels,
}

impl PostListCoordinator {
    /// Build a coordinator for `site_id`, returning the take-once receiving
    /// half of every UI stream. Tracker mutations trigger a coarse window
    /// reload through the paged store.
    #[must_use]
    pub fn new(site_id: i64, config: Config, collab: Collaborators) -> (Self, UiReceivers) {
        let (ui, receivers) = UiChannels::new();

        let paged = collab.paged.clone();
        let tracker = CriticalActionTracker::new(Arc::new(move || paged.invalidate_data()));

        let coordinator = Self {
            site_id,
            upload_statuses: UploadStatusCache::new(config.cache.upload_status_max_entries),
            featured_images: FeaturedImageCache::new(config.cache.featured_image_max_entries),
            config,
            collab,
            tracker,
            scroll: ScrollCoordinator::new(),
            current_window: None,
            ui,
        };

        info!(site_id, "post list coordinator created");
        (coordinator, receivers)
    }

    #[must_use]
    pub const fn site_id(&self) -> i64 {
        self.site_id
    }

    /// Refetch the first page of the list.
    pub fn fetch_first_page(&self) {
        self.collab.paged.fetch_first_page();
    }

    // Commands

    /// Move a post to trash. Requires connectivity; cancels the post's
    /// in-flight uploads and dispatches the remote trash command.
    pub fn trash(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let post = self.resolve_post(id)?;
        self.check_network()?;

        self.tracker.add(id, CriticalAction::Trashing);
        self.ui
            .emit_upload_action(PostUploadAction::CancelPostAndMediaUpload(id));
        self.collab.remote.dispatch_trash(&post);

        Ok(())
    }

    /// Restore a trashed post. Symmetric to [`Self::trash`].
    pub fn restore(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let post = self.resolve_post(id)?;
        self.check_network()?;

        self.tracker.add(id, CriticalAction::Restoring);
        self.collab.remote.dispatch_restore(&post);

        Ok(())
    }

    /// Delete a post. Never-synced posts are removed purely locally: no
    /// remote round trip, no tracker entry. Synced posts go through the
    /// two-phase remote delete; the tracker entry is cleared only on the
    /// removal sub-event.
    pub fn delete(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let post = self.resolve_post(id)?;

        if post.is_synced() {
            self.tracker.add(id, CriticalAction::Deleting);
            self.collab.remote.dispatch_delete(&post);
        } else {
            self.ui
                .emit_action(PostListAction::DismissPendingNotification(id));
            self.collab.remote.dispatch_remove_local(&post);
        }

        Ok(())
    }

    /// Forward a post to the upload/publish pipeline. Not a critical action;
    /// never tracked.
    pub fn publish(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let _ = self.resolve_post(id)?;
        self.ui
            .emit_upload_action(PostUploadAction::PublishPost(id));

        Ok(())
    }

    /// Open a post for editing. An unresolved remote/local divergence defers
    /// to conflict resolution instead. A queued post upload is unlinked from
    /// its media (which keep uploading) since the post is about to change.
    pub fn edit(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let post = self.resolve_post(id)?;

        if self.collab.conflicts.has_unhandled_conflict(&post) {
            debug!(%id, "edit deferred to conflict resolution");
            self.collab.conflicts.request_resolution(&post);
            return Ok(());
        }

        if self.collab.uploads.is_uploading_or_queued(&post) {
            self.collab.uploads.cancel_queued_post_upload(id);
        }
        self.ui.emit_action(PostListAction::EditPost(id));

        Ok(())
    }

    pub fn new_post(&mut self) {
        self.ui.emit_action(PostListAction::NewPost);
    }

    pub fn view_post(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let _ = self.resolve_post(id)?;
        self.ui.emit_action(PostListAction::ViewPost(id));
        Ok(())
    }

    pub fn preview_post(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let _ = self.resolve_post(id)?;
        self.ui.emit_action(PostListAction::PreviewPost(id));
        Ok(())
    }

    pub fn view_stats(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let _ = self.resolve_post(id)?;
        self.ui.emit_action(PostListAction::ViewStats(id));
        Ok(())
    }

    pub fn retry_upload(&mut self, id: LocalPostId) -> Result<(), PostListError> {
        let _ = self.resolve_post(id)?;
        self.ui.emit_action(PostListAction::RetryUpload(id));
        Ok(())
    }

    /// Scroll to a post, now if its row is materialized, otherwise once it
    /// shows up in a future window.
    pub fn scroll_to_post(&mut self, id: LocalPostId) {
        if let Some(index) = self.scroll.request(id, self.current_window.as_ref()) {
            self.ui.emit_scroll(index);
        }
    }

    // Snackbar feedback

    /// The user pressed a snackbar's undo button.
    pub fn on_snackbar_action(&mut self, undo: UndoAction) {
        match undo {
            UndoAction::RestorePost(id) => {
                if self.restore(id).is_ok() {
                    self.ui
                        .emit_snackbar(SnackbarMessage::plain(NOTICE_POST_RESTORING));
                }
            }
            UndoAction::TrashPost(id) => {
                if self.trash(id).is_ok() {
                    self.ui
                        .emit_snackbar(SnackbarMessage::plain(NOTICE_POST_TRASHING));
                }
            }
        }
    }

    /// The snackbar went away without the undo being taken. The tracker was
    /// already cleared when the completion event was accepted; only
    /// bookkeeping remains.
    pub fn on_snackbar_dismissed(&self) {
        debug!("snackbar dismissed");
    }

    // Rendering projections

    /// Compose the render-ready state for one row. Cached pieces (upload
    /// status, featured image) are reused until their ids are invalidated.
    pub fn row_state(&mut self, post: &PostSummary) -> PostRowState {
        let upload_status = self
            .upload_statuses
            .get_or_compute(post, &*self.collab.uploads);
        let featured_image_url = self.featured_images.resolve(
            post.featured_media_id,
            &post.content,
            &*self.collab.media,
        );

        PostRowState {
            local_id: post.local_id,
            title: post.title.clone(),
            status: post.status,
            formatted_date: post.formatted_date(),
            featured_image_url,
            upload_status,
            has_unhandled_conflict: self.collab.conflicts.has_unhandled_conflict(post),
            performing_critical_action: self.tracker.contains(post.local_id),
        }
    }

    /// Coarse list view state from the paged-store signals.
    #[must_use]
    pub fn view_state(&self) -> PostListViewState {
        derive_view_state(
            &self.collab.paged.signals(),
            self.collab.connectivity.is_network_available(),
        )
    }

    #[must_use]
    pub const fn tracker(&self) -> &CriticalActionTracker {
        &self.tracker
    }

    // Invalidation

    /// Evict upload statuses and reload the visible window. Only rows whose
    /// entries were evicted recompute; the rest render from cache.
    pub(crate) fn invalidate_upload_statuses(&mut self, ids: &[LocalPostId]) {
        self.upload_statuses.invalidate(ids);
        self.collab.paged.invalidate_data();
    }

    /// Evict featured image entries and reload the visible window.
    pub(crate) fn invalidate_featured_media(&mut self, ids: &[RemoteMediaId]) {
        self.featured_images.invalidate(ids);
        self.collab.paged.invalidate_data();
    }

    // Helpers

    pub(crate) fn resolve_post(&self, id: LocalPostId) -> Result<PostSummary, PostListError> {
        self.collab
            .posts
            .post_by_local_id(id)
            .ok_or(PostListError::ItemNotFound(id))
    }

    pub(crate) fn check_network(&self) -> Result<(), PostListError> {
        if self.collab.connectivity.is_network_available() {
            Ok(())
        } else {
            self.ui.emit_toast(ToastMessage::new(NOTICE_NO_NETWORK));
            Err(PostListError::NetworkUnavailable)
        }
    }

    pub(crate) fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for PostListCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostListCoordinator")
            .field("site_id", &self.site_id)
            .field("tracker", &self.tracker)
            .field("upload_statuses", &self.upload_statuses)
            .field("featured_images", &self.featured_images)
            .finish()
    }
}
