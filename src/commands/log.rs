//! `show`, `export` and `clear`: operate on a session's stored log.

use std::path::Path;

use crate::display::{print_cleared, print_entries};
use crate::feed::{JsonlFeed, RawFeedItem};
use crate::session::{Baseline, ClipboardSink, FileSink, LogStorage, SessionLogStore, WriterSink};

use super::CommandError;

/// Activate `session` from storage alone, failing if nothing is stored.
fn restore<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    session: &str,
) -> Result<(), CommandError> {
    let empty: &[RawFeedItem] = &[];
    if store.activate(session, empty, Baseline::Auto) {
        Ok(())
    } else {
        Err(CommandError::UnknownSession(session.to_string()))
    }
}

/// Print the stored log of `session`.
///
/// # Errors
///
/// Returns an error if the session has no stored log.
pub fn show<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    session: &str,
    plain: bool,
) -> Result<usize, CommandError> {
    restore(store, session)?;
    let entries = store.entries();
    print_entries(&entries, plain);
    Ok(entries.len())
}

/// Write the copy text of `session` to `output`, or stdout.
///
/// Returns whether the text was delivered; delivery failures are logged.
///
/// # Errors
///
/// Returns an error if the session has no stored log.
pub fn export<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    session: &str,
    output: Option<&Path>,
) -> Result<bool, CommandError> {
    restore(store, session)?;
    let mut sink: Box<dyn ClipboardSink> = match output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::stdout()),
    };
    Ok(store.copy_to(sink.as_mut()))
}

/// Clear the log of `session`.
///
/// With a feed file the cursor skips everything currently in it. Clearing a
/// session that has no stored log is not an error.
///
/// # Errors
///
/// Returns an error if the feed file cannot be read.
pub async fn clear<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    session: &str,
    feed_path: Option<&Path>,
    plain: bool,
) -> Result<(), CommandError> {
    let feed = match feed_path {
        Some(path) => JsonlFeed::open(path).await?.items().to_vec(),
        None => Vec::new(),
    };

    let name = session.to_string();
    store.on_clear(move || print_cleared(&name, plain));
    store.activate(session, &feed, Baseline::Auto);
    store.clear(&feed);
    Ok(())
}
