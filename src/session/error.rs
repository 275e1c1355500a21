//! Session storage error types.

use std::path::PathBuf;

/// Why a session log snapshot or feed position could not be read or written.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The session store file could not be opened.
    #[error("Cannot open session store {path}: {source}")]
    OpenStore {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The directory that holds the session store could not be created.
    #[error("Cannot create session store directory {path}: {source}")]
    StoreDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session store query failed: {0}")]
    Sql(#[from] rusqlite::Error),

    /// A snapshot could not be encoded, or a stored one is not a record list.
    #[error("Session snapshot unreadable: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}
