//! Growth notifications for a feed file.
//!
//! Filesystem events are debounced with notify-debouncer-full and coalesced
//! so that each debounce window yields at most one [`FeedSignal::Changed`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache,
};
use tokio::sync::mpsc;

use super::error::FeedError;

/// Debounce window for filesystem events.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Notifications emitted by [`FeedWatcher`].
#[derive(Debug)]
pub enum FeedSignal {
    /// The feed file was created or modified.
    Changed,
    /// The feed file was removed.
    Removed(PathBuf),
    /// The underlying watcher reported an error.
    Error(FeedError),
}

/// Watches one feed file and reports coarse change signals.
///
/// Dropping the watcher stops it and closes the channel.
pub struct FeedWatcher {
    path: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl std::fmt::Debug for FeedWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedWatcher").field("path", &self.path).finish()
    }
}

impl FeedWatcher {
    /// Start watching `path`.
    ///
    /// The parent directory is watched so that the file may be created or
    /// replaced after the watcher starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub fn new(path: PathBuf) -> Result<(Self, mpsc::UnboundedReceiver<FeedSignal>), FeedError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let target = path.clone();

        let mut debouncer = new_debouncer(DEBOUNCE, None, move |result: DebounceEventResult| {
            for signal in signals(result, &target) {
                if tx.send(signal).is_err() {
                    break;
                }
            }
        })?;

        let watch_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debouncer.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "Watching feed file");

        Ok((
            Self {
                path,
                _debouncer: debouncer,
            },
            rx,
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reduce one debounce batch to the signals worth sending.
fn signals(result: DebounceEventResult, target: &Path) -> Vec<FeedSignal> {
    let events = match result {
        Ok(events) => events,
        Err(errors) => {
            return errors
                .into_iter()
                .map(|e| FeedSignal::Error(FeedError::Notify(e)))
                .collect();
        }
    };

    let mut changed = false;
    let mut removed = false;
    for event in events.iter().filter(|e| touches(e, target)) {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => changed = true,
            EventKind::Remove(_) => removed = true,
            _ => {}
        }
    }

    let mut out = Vec::new();
    if removed {
        out.push(FeedSignal::Removed(target.to_path_buf()));
    }
    if changed {
        out.push(FeedSignal::Changed);
    }
    out
}

fn touches(event: &DebouncedEvent, target: &Path) -> bool {
    event
        .paths
        .iter()
        .any(|p| p == target || p.file_name().is_some_and(|n| Some(n) == target.file_name()))
}
