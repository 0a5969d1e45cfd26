//! src/model/post.rs
//! ============================================================================
//! # `PostSummary`: Local Snapshot of a Content Post
//!
//! The list-visible projection of a post as the local store knows it. The
//! coordinator never owns posts; it resolves them through the `PostStore`
//! collaborator on demand and works with these snapshots.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::model::ids::{LocalPostId, RemoteMediaId, RemotePostId};

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Pending,
    Private,
    Published,
    Scheduled,
    Trashed,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &str = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Published => "published",
            Self::Scheduled => "scheduled",
            Self::Trashed => "trashed",
        };

        write!(f, "{s}")
    }
}

/// Snapshot of a post as resolved from the local store.
#[derive(Debug, Clone)]
pub struct PostSummary {
    /// Stable local identity; the only caching/tracking key.
    pub local_id: LocalPostId,

    /// Remote identity, present once the post has synced at least once.
    pub remote_id: Option<RemotePostId>,

    /// Site the post belongs to; events for other sites are ignored.
    pub site_id: i64,

    pub title: CompactString,

    /// Raw content, scanned for an embedded image when no featured media
    /// id is set.
    pub content: String,

    pub status: PostStatus,

    /// Remote id of the featured media, if one is attached.
    pub featured_media_id: Option<RemoteMediaId>,

    /// Last modification date.
    pub date: DateTime<Utc>,
}

impl PostSummary {
    /// Whether the post has ever synced remotely. Never-synced posts are
    /// deleted purely locally, without a remote round trip.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Human-readable date for row rendering.
    #[must_use]
    pub fn formatted_date(&self) -> CompactString {
        CompactString::from(self.date.format("%b %-d, %Y").to_string())
    }
}
