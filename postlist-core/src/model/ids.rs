//! src/model/ids.rs
//! ============================================================================
//! # Identity Newtypes
//!
//! A post carries a stable local id assigned at creation and, once it has
//! synced, an additional remote id. The local id never changes and is never
//! reused, so it is the identity for every cache and tracker key in this
//! crate. Remote ids only matter at the remote boundary and for media.

use serde::{Deserialize, Serialize};

/// Stable local identity of a post. Assigned at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalPostId(pub i64);

/// Remote identity of a post, assigned after the first successful sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemotePostId(pub i64);

/// Remote identity of a media item (featured images).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteMediaId(pub i64);

impl std::fmt::Display for LocalPostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local:{}", self.0)
    }
}

impl std::fmt::Display for RemotePostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote:{}", self.0)
    }
}

impl std::fmt::Display for RemoteMediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "media:{}", self.0)
    }
}
