//! src/coordinator/event_loop.rs
//! ============================================================================
//! # Run Loop
//!
//! Owns the coordinator and drives it from two unbounded queues: inbound
//! completion events and host-issued commands. Because the loop is the only
//! caller of the coordinator's `&mut self` entry points, every event and
//! command is applied fully before the next one is looked at.

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coordinator::events::PostListEvent;
use crate::coordinator::orchestrator::PostListCoordinator;
use crate::model::ids::LocalPostId;
use crate::ui::actions::UndoAction;

/// Host-issued commands, funneled through the run loop so they serialize
/// with event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListCommand {
    Trash(LocalPostId),
    Restore(LocalPostId),
    Delete(LocalPostId),
    Publish(LocalPostId),
    Edit(LocalPostId),
    NewPost,
    ViewPost(LocalPostId),
    PreviewPost(LocalPostId),
    ViewStats(LocalPostId),
    RetryUpload(LocalPostId),
    ScrollToPost(LocalPostId),
    SnackbarAction(UndoAction),
    SnackbarDismissed,
    FetchFirstPage,
}

/// Cloneable handle the host uses to feed the loop.
#[derive(Debug, Clone)]
pub struct EventLoopHandle {
    event_tx: UnboundedSender<PostListEvent>,
    command_tx: UnboundedSender<PostListCommand>,
    cancel: CancellationToken,
}

impl EventLoopHandle {
    pub fn send_event(&self, event: PostListEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("event dropped, run loop has shut down");
        }
    }

    pub fn send_command(&self, command: PostListCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("command dropped, run loop has shut down");
        }
    }

    /// Request shutdown. The loop drains already-queued items and exits.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

pub struct EventLoop {
    coordinator: PostListCoordinator,
    event_rx: mpsc::UnboundedReceiver<PostListEvent>,
    command_rx: mpsc::UnboundedReceiver<PostListCommand>,
    cancel: CancellationToken,
}

impl EventLoop {
    #[must_use]
    pub fn new(coordinator: PostListCoordinator) -> (Self, EventLoopHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = EventLoopHandle {
            event_tx,
            command_tx,
            cancel: cancel.clone(),
        };

        (
            Self {
                coordinator,
                event_rx,
                command_rx,
                cancel,
            },
            handle,
        )
    }

    /// Drive the coordinator until shutdown or until every sender is gone.
    /// Returns the coordinator so the host can inspect final state.
    pub async fn run(mut self) -> PostListCoordinator {
        info!("post list run loop started");

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    info!("post list run loop cancelled");
                    self.drain();
                    break;
                }

                maybe_event = self.event_rx.recv() => match maybe_event {
                    Some(event) => {
                        debug!(?event, "event received");
                        self.coordinator.handle_event(event);
                    }
                    None => {
                        info!("all event senders dropped, run loop exiting");
                        break;
                    }
                },

                Some(command) = self.command_rx.recv() => {
                    debug!(?command, "command received");
                    self.apply(command);
                }
            }
        }

        self.coordinator
    }

    /// Apply whatever was already queued when shutdown was requested, so a
    /// command sent just before `shutdown()` is never lost.
    fn drain(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply(command);
        }
        while let Ok(event) = self.event_rx.try_recv() {
            self.coordinator.handle_event(event);
        }
    }

    /// Command failures surface to the user through the toast queue inside
    /// the coordinator; here they only get a log line.
    fn apply(&mut self, command: PostListCommand) {
        let result = match command {
            PostListCommand::Trash(id) => self.coordinator.trash(id),
            PostListCommand::Restore(id) => self.coordinator.restore(id),
            PostListCommand::Delete(id) => self.coordinator.delete(id),
            PostListCommand::Publish(id) => self.coordinator.publish(id),
            PostListCommand::Edit(id) => self.coordinator.edit(id),
            PostListCommand::ViewPost(id) => self.coordinator.view_post(id),
            PostListCommand::PreviewPost(id) => self.coordinator.preview_post(id),
            PostListCommand::ViewStats(id) => self.coordinator.view_stats(id),
            PostListCommand::RetryUpload(id) => self.coordinator.retry_upload(id),

            PostListCommand::NewPost => {
                self.coordinator.new_post();
                Ok(())
            }
            PostListCommand::ScrollToPost(id) => {
                self.coordinator.scroll_to_post(id);
                Ok(())
            }
            PostListCommand::SnackbarAction(undo) => {
                self.coordinator.on_snackbar_action(undo);
                Ok(())
            }
            PostListCommand::SnackbarDismissed => {
                self.coordinator.on_snackbar_dismissed();
                Ok(())
            }
            PostListCommand::FetchFirstPage => {
                self.coordinator.fetch_first_page();
                Ok(())
            }
        };

        if let Err(error) = result {
            warn!(%error, ?command, "command not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::coordinator::orchestrator::Collaborators;
    use crate::model::row::DataWindow;
    use crate::stores::{
        ConflictResolver, Connectivity, ListSignals, MediaItem, MediaStore, PagedListStore,
        PostStore, RemoteDispatcher, UploadMonitor,
    };
    use crate::model::ids::RemoteMediaId;
    use crate::model::post::PostSummary;
    use compact_str::CompactString;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct NullPaged {
        first_page_fetches: AtomicUsize,
    }

    impl PagedListStore for NullPaged {
        fn fetch_first_page(&self) {
            self.first_page_fetches.fetch_add(1, Ordering::Relaxed);
        }

        fn invalidate_data(&self) {}

        fn signals(&self) -> ListSignals {
            ListSignals::default()
        }
    }

    struct NullPosts;

    impl PostStore for NullPosts {
        fn post_by_local_id(&self, _id: LocalPostId) -> Option<PostSummary> {
            None
        }
    }

    struct NullRemote;

    impl RemoteDispatcher for NullRemote {
        fn dispatch_trash(&self, _post: &PostSummary) {}
        fn dispatch_restore(&self, _post: &PostSummary) {}
        fn dispatch_delete(&self, _post: &PostSummary) {}
        fn dispatch_remove_local(&self, _post: &PostSummary) {}
    }

    struct NullUploads;

    impl UploadMonitor for NullUploads {
        fn upload_error(&self, _post: &PostSummary) -> Option<CompactString> {
            None
        }
        fn is_uploading(&self, _post: &PostSummary) -> bool {
            false
        }
        fn is_queued(&self, _post: &PostSummary) -> bool {
            false
        }
        fn is_uploading_or_queued(&self, _post: &PostSummary) -> bool {
            false
        }
        fn is_failed(&self, _post: &PostSummary) -> bool {
            false
        }
        fn media_upload_progress(&self, _post: &PostSummary) -> f32 {
            0.0
        }
        fn has_in_progress_media_upload(&self, _post: &PostSummary) -> bool {
            false
        }
        fn has_pending_media_upload(&self, _post: &PostSummary) -> bool {
            false
        }
        fn cancel_queued_post_upload(&self, _id: LocalPostId) {}
    }

    struct NullMedia;

    impl MediaStore for NullMedia {
        fn lookup_local_media(&self, _id: RemoteMediaId) -> Option<MediaItem> {
            None
        }
        fn dispatch_fetch(&self, _id: RemoteMediaId) {}
    }

    struct NullConflicts;

    impl ConflictResolver for NullConflicts {
        fn has_unhandled_conflict(&self, _post: &PostSummary) -> bool {
            false
        }
        fn request_resolution(&self, _post: &PostSummary) {}
        fn on_post_updated(&self, _id: LocalPostId) {}
    }

    struct NullConnectivity;

    impl Connectivity for NullConnectivity {
        fn is_network_available(&self) -> bool {
            true
        }
    }

    fn null_coordinator(paged: Arc<NullPaged>) -> PostListCoordinator {
        let collab = Collaborators {
            paged,
            posts: Arc::new(NullPosts),
            remote: Arc::new(NullRemote),
            uploads: Arc::new(NullUploads),
            media: Arc::new(NullMedia),
            conflicts: Arc::new(NullConflicts),
            connectivity: Arc::new(NullConnectivity),
        };
        PostListCoordinator::new(1, Config::default(), collab).0
    }

    #[tokio::test]
    async fn test_run_loop_applies_commands_then_shuts_down() {
        let paged = Arc::new(NullPaged::default());
        let (event_loop, handle) = EventLoop::new(null_coordinator(paged.clone()));
        let join = tokio::spawn(event_loop.run());

        handle.send_command(PostListCommand::FetchFirstPage);
        handle.send_command(PostListCommand::ScrollToPost(LocalPostId(4)));
        handle.shutdown();

        let coordinator = join.await.unwrap();
        assert_eq!(paged.first_page_fetches.load(Ordering::Relaxed), 1);
        assert_eq!(coordinator.scroll.pending(), Some(LocalPostId(4)));
    }

    #[tokio::test]
    async fn test_run_loop_exits_when_senders_drop() {
        let paged = Arc::new(NullPaged::default());
        let (event_loop, handle) = EventLoop::new(null_coordinator(paged));
        let join = tokio::spawn(event_loop.run());

        handle.send_event(PostListEvent::WindowArrived {
            window: DataWindow { rows: Vec::new() },
        });
        drop(handle);

        let coordinator = join.await.unwrap();
        assert!(coordinator.current_window.is_some());
    }
}
