//! src/model/row.rs
//! ============================================================================
//! # Row Projection and List View State
//!
//! The rendered shape of the list: materialized rows composed by the
//! coordinator, placeholders for rows the paginated store has not loaded
//! yet, and the coarse empty/error/loading state derived from the store's
//! observable signals. `derive_view_state` is a pure recomputation function;
//! the host re-invokes it whenever any constituent signal changes.

use compact_str::CompactString;

use crate::cache::upload_status::PostUploadStatus;
use crate::model::ids::LocalPostId;
use crate::model::post::PostStatus;
use crate::stores::ListSignals;

/// Fully composed, render-ready state of one visible row.
#[derive(Debug, Clone)]
pub struct PostRowState {
    pub local_id: LocalPostId,
    pub title: CompactString,
    pub status: PostStatus,
    pub formatted_date: CompactString,
    pub featured_image_url: Option<String>,
    pub upload_status: PostUploadStatus,
    pub has_unhandled_conflict: bool,

    /// True while a trash/restore/delete is in flight; disables the row's
    /// destructive buttons.
    pub performing_critical_action: bool,
}

/// One row of the visible window.
#[derive(Debug, Clone)]
pub enum PostRow {
    /// Not yet loaded by the paginated store.
    Placeholder,

    Post(PostRowState),
}

impl PostRow {
    #[must_use]
    pub const fn local_id(&self) -> Option<LocalPostId> {
        match self {
            Self::Placeholder => None,
            Self::Post(state) => Some(state.local_id),
        }
    }
}

/// The currently visible window of rows as delivered by the paginated store.
#[derive(Debug, Clone, Default)]
pub struct DataWindow {
    pub rows: Vec<PostRow>,
}

impl DataWindow {
    /// Index of the materialized row for `id`; placeholders never match.
    #[must_use]
    pub fn position_of(&self, id: LocalPostId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.local_id() == Some(id))
    }
}

/// Coarse list-level view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListViewState {
    Loading,

    /// Rows are available and rendered from the window.
    Content,

    /// Nothing to show; the host offers creating a first post.
    Empty,

    /// The last refresh failed; retried on the next connectivity-regained
    /// event.
    RefreshError(CompactString),
}

/// Pure derivation of the list view state from the store signals.
#[must_use]
pub fn derive_view_state(signals: &ListSignals, is_network_available: bool) -> PostListViewState {
    if !signals.is_empty {
        return PostListViewState::Content;
    }

    if signals.is_fetching_first_page || signals.is_loading_more {
        return PostListViewState::Loading;
    }

    match &signals.last_error {
        Some(err) if !is_network_available => PostListViewState::RefreshError(
            CompactString::from(format!("{err} (offline)")),
        ),
        Some(err) => PostListViewState::RefreshError(err.clone()),
        None => PostListViewState::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(empty: bool, fetching: bool, error: Option<&str>) -> ListSignals {
        ListSignals {
            is_fetching_first_page: fetching,
            is_loading_more: false,
            is_empty: empty,
            last_error: error.map(CompactString::from),
        }
    }

    #[test]
    fn test_content_wins_over_everything() {
        let state = derive_view_state(&signals(false, true, Some("boom")), false);
        assert_eq!(state, PostListViewState::Content);
    }

    #[test]
    fn test_empty_fetching_is_loading() {
        let state = derive_view_state(&signals(true, true, None), true);
        assert_eq!(state, PostListViewState::Loading);
    }

    #[test]
    fn test_refresh_error_and_empty() {
        assert!(matches!(
            derive_view_state(&signals(true, false, Some("boom")), true),
            PostListViewState::RefreshError(_)
        ));
        assert_eq!(
            derive_view_state(&signals(true, false, None), true),
            PostListViewState::Empty
        );
    }

    #[test]
    fn test_position_skips_placeholders() {
        let window = DataWindow {
            rows: vec![
                PostRow::Placeholder,
                PostRow::Post(PostRowState {
                    local_id: LocalPostId(3),
                    title: CompactString::const_new("t"),
                    status: PostStatus::Published,
                    formatted_date: CompactString::const_new(""),
                    featured_image_url: None,
                    upload_status: PostUploadStatus {
                        upload_error: None,
                        media_upload_progress: 0,
                        is_uploading: false,
                        is_uploading_or_queued: false,
                        is_queued: false,
                        is_upload_failed: false,
                        has_in_progress_media_upload: false,
                        has_pending_media_upload: false,
                    },
                    has_unhandled_conflict: false,
                    performing_critical_action: false,
                }),
            ],
        };

        assert_eq!(window.position_of(LocalPostId(3)), Some(1));
        assert_eq!(window.position_of(LocalPostId(4)), None);
    }
}
