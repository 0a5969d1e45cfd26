pub mod error;

pub mod config;

pub mod logging;

pub mod stores;

pub mod model {
    pub mod ids;
    pub use ids::{LocalPostId, RemoteMediaId, RemotePostId};

    pub mod post;
    pub use post::{PostStatus, PostSummary};

    pub mod row;
    pub use row::{DataWindow, PostListViewState, PostRow, PostRowState};
}

pub mod cache {
    pub mod upload_status;
    pub use upload_status::{PostUploadStatus, UploadStatusCache};

    pub mod featured_image;
    pub use featured_image::FeaturedImageCache;
}

pub mod ui {
    pub mod actions;
    pub use actions::{
        PostListAction, PostUploadAction, SnackbarMessage, ToastMessage, UiChannels, UiReceivers,
        UndoAction,
    };
}

pub mod coordinator {
    pub mod critical_tracker;
    pub use critical_tracker::{CriticalAction, CriticalActionTracker, InvalidationListener};

    pub mod events;
    pub use events::{DeletePhase, PostChangeCause, PostListEvent};

    pub mod scroll;
    pub use scroll::ScrollCoordinator;

    pub mod orchestrator;
    pub use orchestrator::{Collaborators, PostListCoordinator};

    pub mod reconciler;

    pub mod event_loop;
    pub use event_loop::{EventLoop, EventLoopHandle, PostListCommand};
}

pub use coordinator::{EventLoop, EventLoopHandle, PostListCommand, PostListCoordinator};
pub use error::PostListError;
