use thiserror::Error;

/// Errors that can occur while constructing or running a synchronizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    /// A tracked key is unusable (empty).
    #[error("invalid parameter key: {0}")]
    InvalidKey(#[from] qsync_types::TypeError),

    /// The same key was listed twice for one synchronizer.
    #[error("duplicate parameter key: {0}")]
    DuplicateKey(String),

    /// The key is not owned by this synchronizer.
    #[error("parameter key is not tracked by this synchronizer: {0}")]
    UntrackedKey(String),

    /// The navigator refused or failed to commit. Not retried.
    #[error("navigation commit failed: {0}")]
    Navigation(#[from] NavigationError),
}

/// Failure reported by a [`Navigator`](crate::Navigator) commit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The navigation environment refused the new query string.
    #[error("navigation to '?{query}' rejected: {reason}")]
    Rejected { query: String, reason: String },
}

/// Convenience type alias for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;
