//! src/ui/actions.rs
//! ============================================================================
//! # One-Shot UI Streams
//!
//! Payload types for everything the coordinator surfaces to the UI layer,
//! delivered through take-once queues (tokio mpsc), never a re-deliverable
//! broadcast: a notice must not re-fire when an unrelated observer
//! re-subscribes. The receiving half is handed to the host once; the
//! coordinator only ever sends.

use std::time::Duration;

use compact_str::CompactString;
use smallvec::SmallVec;
use tokio::sync::mpsc;
use tracing::warn;

use crate::model::ids::{LocalPostId, RemoteMediaId};

/// Navigation/command actions surfaced to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListAction {
    NewPost,
    EditPost(LocalPostId),
    ViewPost(LocalPostId),
    PreviewPost(LocalPostId),
    ViewStats(LocalPostId),
    RetryUpload(LocalPostId),

    /// Cancel the pending local-draft notification before a local delete.
    DismissPendingNotification(LocalPostId),
}

/// Commands and results for the external upload/publish pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostUploadAction {
    PublishPost(LocalPostId),

    /// Explicit cancellation point: trash cancels the post upload and its
    /// in-flight media uploads.
    CancelPostAndMediaUpload(LocalPostId),

    /// A remote post upload finished; the host shows the outcome.
    PostUploadedNotice { id: LocalPostId, is_error: bool },

    /// A media-only upload batch finished (no post involved); the host
    /// shows the outcome for the affected media.
    MediaUploadedNotice {
        media_ids: SmallVec<[RemoteMediaId; 4]>,
        is_error: bool,
        message: Option<CompactString>,
    },
}

/// Short transient notice without actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: CompactString,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<CompactString>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The reversal a snackbar's accept button performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoAction {
    RestorePost(LocalPostId),
    TrashPost(LocalPostId),
}

/// Transient prompt, optionally offering to reverse the completed action.
/// The host feeds the user's choice back through
/// `PostListCoordinator::on_snackbar_action` / `on_snackbar_dismissed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnackbarMessage {
    pub message: CompactString,
    pub undo: Option<UndoAction>,
    pub auto_dismiss: Option<Duration>,
}

impl SnackbarMessage {
    #[must_use]
    pub fn plain(message: impl Into<CompactString>) -> Self {
        Self {
            message: message.into(),
            undo: None,
            auto_dismiss: None,
        }
    }

    #[must_use]
    pub fn with_undo(
        message: impl Into<CompactString>,
        undo: UndoAction,
        auto_dismiss: Duration,
    ) -> Self {
        Self {
            message: message.into(),
            undo: Some(undo),
            auto_dismiss: Some(auto_dismiss),
        }
    }
}

/// Sending half of every one-shot stream, owned by the coordinator.
#[derive(Debug, Clone)]
pub struct UiChannels {
    list_action_tx: mpsc::UnboundedSender<PostListAction>,
    upload_action_tx: mpsc::UnboundedSender<PostUploadAction>,
    toast_tx: mpsc::UnboundedSender<ToastMessage>,
    snackbar_tx: mpsc::UnboundedSender<SnackbarMessage>,
    scroll_tx: mpsc::UnboundedSender<usize>,
}

/// Receiving half, handed to the host UI exactly once.
#[derive(Debug)]
pub struct UiReceivers {
    pub list_actions: mpsc::UnboundedReceiver<PostListAction>,
    pub upload_actions: mpsc::UnboundedReceiver<PostUploadAction>,
    pub toasts: mpsc::UnboundedReceiver<ToastMessage>,
    pub snackbars: mpsc::UnboundedReceiver<SnackbarMessage>,
    pub scroll_to_index: mpsc::UnboundedReceiver<usize>,
}

impl UiChannels {
    #[must_use]
    pub fn new() -> (Self, UiReceivers) {
        let (list_action_tx, list_actions) = mpsc::unbounded_channel();
        let (upload_action_tx, upload_actions) = mpsc::unbounded_channel();
        let (toast_tx, toasts) = mpsc::unbounded_channel();
        let (snackbar_tx, snackbars) = mpsc::unbounded_channel();
        let (scroll_tx, scroll_to_index) = mpsc::unbounded_channel();

        (
            Self {
                list_action_tx,
                upload_action_tx,
                toast_tx,
                snackbar_tx,
                scroll_tx,
            },
            UiReceivers {
                list_actions,
                upload_actions,
                toasts,
                snackbars,
                scroll_to_index,
            },
        )
    }

    pub fn emit_action(&self, action: PostListAction) {
        if self.list_action_tx.send(action).is_err() {
            warn!("post list action receiver dropped");
        }
    }

    pub fn emit_upload_action(&self, action: PostUploadAction) {
        if self.upload_action_tx.send(action).is_err() {
            warn!("upload action receiver dropped");
        }
    }

    pub fn emit_toast(&self, toast: ToastMessage) {
        if self.toast_tx.send(toast).is_err() {
            warn!("toast receiver dropped");
        }
    }

    pub fn emit_snackbar(&self, snackbar: SnackbarMessage) {
        if self.snackbar_tx.send(snackbar).is_err() {
            warn!("snackbar receiver dropped");
        }
    }

    pub fn emit_scroll(&self, index: usize) {
        if self.scroll_tx.send(index).is_err() {
            warn!("scroll receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_deliver_each_payload_once() {
        let (channels, mut receivers) = UiChannels::new();

        channels.emit_toast(ToastMessage::new("one"));
        channels.emit_toast(ToastMessage::new("two"));

        assert_eq!(receivers.toasts.try_recv().unwrap().message, "one");
        assert_eq!(receivers.toasts.try_recv().unwrap().message, "two");
        assert!(receivers.toasts.try_recv().is_err());
    }

    #[test]
    fn test_emit_after_receiver_drop_does_not_panic() {
        let (channels, receivers) = UiChannels::new();
        drop(receivers);

        channels.emit_scroll(3);
        channels.emit_action(PostListAction::NewPost);
    }
}
