//! Feed adapter error types.

use std::path::PathBuf;

/// Errors reading or watching a feed file.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// Feed file does not exist.
    #[error("Feed file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied accessing the feed file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Notification channel closed.
    #[error("Channel closed")]
    ChannelClosed,
}

impl FeedError {
    /// Map an open error for `path` to the matching variant.
    pub(crate) fn from_open(path: &std::path::Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(e),
        }
    }
}
