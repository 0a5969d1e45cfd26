//! src/coordinator/reconciler.rs
//! ============================================================================
//! # Event Reconciler
//!
//! Single ingestion point for every inbound async completion signal. For
//! each event tagged with a critical-action cause the reconciler first asks
//! the tracker whether the event matches the in-flight action; a mismatch
//! means the event is stale or superseded (a second attempt on the same post
//! may already have started) and it is dropped with no side effects at all.
//! Accepted events clear the tracker entry, evict derived caches and emit
//! the user-facing notices.
//!
//! Cache eviction always triggers a coarse whole-window reload: the paged
//! store has no partial-row patch capability, and rows with intact cache
//! entries are reused without recomputation anyway.

use tracing::{debug, warn};

use crate::coordinator::critical_tracker::CriticalAction;
use crate::coordinator::events::{DeletePhase, PostChangeCause, PostListEvent};
use crate::coordinator::orchestrator::{
    NOTICE_DELETE_FAILED, NOTICE_POST_RESTORED, NOTICE_POST_TRASHED, NOTICE_RESTORE_FAILED,
    NOTICE_TRASH_FAILED, PostListCoordinator,
};
use crate::error::PostListError;
use crate::model::ids::LocalPostId;
use crate::model::row::{DataWindow, PostListViewState};
use crate::ui::actions::{PostUploadAction, SnackbarMessage, ToastMessage, UndoAction};

impl PostListCoordinator {
    /// Dispatch one inbound event. Must only be called from the single
    /// serialized event-processing context; a render pass then observes
    /// either all effects of the event or none.
    pub fn handle_event(&mut self, event: PostListEvent) {
        match event {
            PostListEvent::PostChanged { cause, is_error } => {
                self.handle_post_changed(cause, is_error);
            }

            PostListEvent::PostUploaded {
                id,
                site_id,
                is_error,
            } => self.handle_post_uploaded(id, site_id, is_error),

            PostListEvent::MediaChanged {
                media_ids,
                is_error,
            } => {
                if !is_error {
                    self.invalidate_featured_media(&media_ids);
                }
            }

            PostListEvent::MediaUploadResult {
                media_ids,
                is_error,
                message,
            } => {
                if media_ids.is_empty() {
                    return;
                }
                self.ui.emit_upload_action(PostUploadAction::MediaUploadedNotice {
                    media_ids,
                    is_error,
                    message,
                });
            }

            PostListEvent::MediaUploaded {
                media_id,
                post_id,
                site_id,
                is_error,
                canceled,
            } => {
                // Not interested in failed/canceled uploads or media that is
                // not attached to a post of the current site.
                if is_error || canceled || post_id.is_none() || site_id != self.site_id() {
                    return;
                }
                self.invalidate_featured_media(&[media_id]);
            }

            PostListEvent::UploadStarted { id } | PostListEvent::UploadCanceled { id } => {
                self.invalidate_upload_statuses(&[id]);
            }

            PostListEvent::MediaUploadProgress { id } => {
                self.invalidate_upload_statuses(&[id]);
            }

            PostListEvent::MediaRetried { post_ids } => {
                self.invalidate_upload_statuses(&post_ids);
            }

            PostListEvent::ConnectivityChanged { is_connected } => {
                self.handle_connectivity_changed(is_connected);
            }

            PostListEvent::WindowArrived { window } => self.handle_window_arrived(window),
        }
    }

    fn handle_post_changed(&mut self, cause: PostChangeCause, is_error: bool) {
        match cause {
            PostChangeCause::Updated { id } => {
                if is_error {
                    warn!(%id, "remote post update failed");
                } else {
                    self.collaborators().conflicts.on_post_updated(id);
                }
            }

            PostChangeCause::Trashed { id } => self.handle_trashed(id, is_error),

            PostChangeCause::Restored { id } => self.handle_restored(id, is_error),

            PostChangeCause::Deleted { id, phase } => {
                self.handle_deleted_or_removed(id, phase, is_error);
            }
        }
    }

    fn handle_trashed(&mut self, id: LocalPostId, is_error: bool) {
        if self.ensure_tracked(id, CriticalAction::Trashing).is_err() {
            return;
        }

        self.tracker.remove(id, CriticalAction::Trashing);

        if is_error {
            warn!(error = %PostListError::remote_failed(id, CriticalAction::Trashing), "trash failed");
            self.ui.emit_toast(ToastMessage::new(NOTICE_TRASH_FAILED));
            return;
        }

        self.ui.emit_snackbar(SnackbarMessage::with_undo(
            NOTICE_POST_TRASHED,
            UndoAction::RestorePost(id),
            self.config().snackbar_auto_dismiss,
        ));
    }

    fn handle_restored(&mut self, id: LocalPostId, is_error: bool) {
        if self.ensure_tracked(id, CriticalAction::Restoring).is_err() {
            return;
        }

        self.tracker.remove(id, CriticalAction::Restoring);

        if is_error {
            warn!(error = %PostListError::remote_failed(id, CriticalAction::Restoring), "restore failed");
            self.ui.emit_toast(ToastMessage::new(NOTICE_RESTORE_FAILED));
            return;
        }

        self.ui.emit_snackbar(SnackbarMessage::with_undo(
            NOTICE_POST_RESTORED,
            UndoAction::TrashPost(id),
            self.config().snackbar_auto_dismiss,
        ));
    }

    /// Two-phase delete. The acknowledgment only confirms the remote took
    /// the delete; the tracker entry is cleared on the removal sub-event,
    /// once the post has actually left local storage, so destructive UI does
    /// not re-enable early. An acknowledgment error terminates the attempt.
    fn handle_deleted_or_removed(&mut self, id: LocalPostId, phase: DeletePhase, is_error: bool) {
        if self.ensure_tracked(id, CriticalAction::Deleting).is_err() {
            return;
        }

        match phase {
            DeletePhase::Acknowledged => {
                if is_error {
                    self.tracker.remove(id, CriticalAction::Deleting);
                    warn!(error = %PostListError::remote_failed(id, CriticalAction::Deleting), "delete failed");
                    self.ui.emit_toast(ToastMessage::new(NOTICE_DELETE_FAILED));
                }
                // Success: keep tracking until the removal event lands.
            }

            DeletePhase::Removed => {
                if is_error {
                    // Not expected at this phase; report it anyway.
                    warn!(error = %PostListError::remote_failed(id, CriticalAction::Deleting), "removal failed");
                    self.ui.emit_toast(ToastMessage::new(NOTICE_DELETE_FAILED));
                }
                self.tracker.remove(id, CriticalAction::Deleting);
            }
        }
    }

    fn handle_post_uploaded(&mut self, id: LocalPostId, site_id: i64, is_error: bool) {
        if site_id != self.site_id() {
            return;
        }

        self.ui
            .emit_upload_action(PostUploadAction::PostUploadedNotice { id, is_error });
        self.invalidate_upload_statuses(&[id]);

        // A freshly-synced post needs a first-page refetch so list indexes
        // that only recognize remotely-known ids pick it up.
        if !is_error {
            self.fetch_first_page();
        }
    }

    fn handle_connectivity_changed(&mut self, is_connected: bool) {
        if !is_connected {
            return;
        }

        if matches!(self.view_state(), PostListViewState::RefreshError(_)) {
            debug!("connection available after refresh error, refetching first page");
            self.fetch_first_page();
        }
    }

    fn handle_window_arrived(&mut self, window: DataWindow) {
        if let Some(index) = self.scroll.on_window(&window) {
            self.ui.emit_scroll(index);
        }
        self.current_window = Some(window);
    }

    /// Classify an event against the tracker. A mismatch means the event is
    /// stale or superseded and must be dropped without side effects.
    fn ensure_tracked(
        &self,
        id: LocalPostId,
        expected: CriticalAction,
    ) -> Result<(), PostListError> {
        let tracked = self.tracker.get(id);
        if tracked == Some(expected) {
            Ok(())
        } else {
            Err(PostListError::stale_event(id, expected, tracked))
        }
    }
}
