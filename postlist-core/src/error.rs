//! src/error.rs
//! ============================================================================
//! # `PostListError`: Unified Error Type for the Post-List Coordinator
//!
//! Defines the error enum used across the crate. Variants map directly onto
//! the failure taxonomy of the coordinator: connectivity pre-check failures,
//! terminal remote-operation failures, stale completion events and commands
//! addressing posts that no longer resolve locally. All remote failures are
//! terminal per attempt; retry is always an explicit user action.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::coordinator::critical_tracker::CriticalAction;
use crate::model::ids::LocalPostId;

/// Unified error type for all post-list coordinator operations.
#[derive(Debug, Error)]
pub enum PostListError {
    /// Connectivity pre-check failed; the command was short-circuited with a
    /// user notice and no state was mutated.
    #[error("network unavailable")]
    NetworkUnavailable,

    /// A remote mutation completed with an error. The tracker entry has been
    /// cleared and no retry is scheduled.
    #[error("remote {action} failed for post {id}")]
    RemoteOperationFailed {
        id: LocalPostId,
        action: CriticalAction,
    },

    /// A completion event no longer matches the tracked in-flight action.
    /// Dropped without side effects; never surfaced to the user.
    #[error("stale event for post {id}: reported {reported}, tracked {tracked:?}")]
    StaleOrSupersededEvent {
        id: LocalPostId,
        reported: CriticalAction,
        tracked: Option<CriticalAction>,
    },

    /// A command addressed a post the local store can no longer resolve.
    /// Treated as a silent no-op.
    #[error("post {0} not found in local store")]
    ItemNotFound(LocalPostId),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A one-shot UI channel was closed by its receiver.
    #[error("UI channel closed: {0}")]
    ChannelClosed(&'static str),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl PostListError {
    /// Create a terminal remote-operation failure.
    #[must_use]
    pub const fn remote_failed(id: LocalPostId, action: CriticalAction) -> Self {
        Self::RemoteOperationFailed { id, action }
    }

    /// Create a stale-event classification for a mismatched completion event.
    #[must_use]
    pub const fn stale_event(
        id: LocalPostId,
        reported: CriticalAction,
        tracked: Option<CriticalAction>,
    ) -> Self {
        Self::StaleOrSupersededEvent {
            id,
            reported,
            tracked,
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for PostListError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
