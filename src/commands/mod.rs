//! Command implementations behind the `curation-audit` binary.
//!
//! Each command opens the configured storage, activates one session and
//! drives the [`SessionLogStore`] the way an interactive viewer would.

mod follow;
mod log;

use std::path::Path;

use crate::config::{AuditConfig, ConfigError};
use crate::feed::{EventFeed, FeedError};
use crate::format::LabelFormatter;
use crate::session::{SessionLogStore, SqliteStorage, StorageError};

pub use follow::{follow, replay};
pub use log::{clear, export, show};

/// Errors surfaced by commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Feed file could not be read or watched.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// No session was named and none could be inferred from the feed.
    #[error("No session given and none found in the feed")]
    NoSession,

    /// The named session has no stored log.
    #[error("No stored log for session {0}")]
    UnknownSession(String),
}

/// Open the session log store described by `config`.
///
/// `db` overrides the configured database path.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_store(
    config: &AuditConfig,
    db: Option<&Path>,
) -> Result<SessionLogStore<SqliteStorage>, CommandError> {
    let path = db.map_or_else(|| config.storage.resolved_path(), Path::to_path_buf);
    let storage = SqliteStorage::open(&path)?;
    Ok(SessionLogStore::with_formatter(
        storage,
        LabelFormatter::new(&config.format),
    ))
}

/// Session of the most recent feed item that names one.
#[must_use]
pub fn latest_session<F: EventFeed + ?Sized>(feed: &F) -> Option<String> {
    feed.slice(0..feed.len())
        .iter()
        .rev()
        .find_map(|item| item.session_ref.clone().filter(|s| !s.trim().is_empty()))
}
