//! `replay` and `follow`: feed a JSONL file through a session log.

use std::future::Future;
use std::path::Path;

use crate::display::{print_entries, print_report};
use crate::feed::{EventFeed, FeedError, FeedSignal, FeedWatcher, JsonlFeed};
use crate::session::{Baseline, IngestReport, LogStorage, SessionLogStore};

use super::{latest_session, CommandError};

/// Ingest the unconsumed part of `feed` and print what was accepted.
fn ingest_and_print<S: LogStorage, F: EventFeed + ?Sized>(
    store: &mut SessionLogStore<S>,
    feed: &F,
    plain: bool,
) -> IngestReport {
    let before = store.records().len();
    let report = store.ingest(feed);
    if report.accepted > 0 {
        print_entries(&store.entries_from(before), plain);
    }
    report
}

/// Open the feed and activate the requested (or most recent) session.
async fn start<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    feed_path: &Path,
    session: Option<&str>,
    baseline: Baseline,
) -> Result<(JsonlFeed, String), CommandError> {
    let feed = JsonlFeed::open(feed_path).await?;
    let session = match session {
        Some(s) => s.to_string(),
        None => latest_session(&feed).ok_or(CommandError::NoSession)?,
    };
    store.activate(&session, &feed, baseline);
    Ok((feed, session))
}

/// Read `feed_path` once into the session log and print new records.
///
/// # Errors
///
/// Returns an error if the feed cannot be read or no session can be chosen.
pub async fn replay<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    feed_path: &Path,
    session: Option<&str>,
    baseline: Baseline,
    plain: bool,
) -> Result<IngestReport, CommandError> {
    let (feed, session) = start(store, feed_path, session, baseline).await?;
    let report = ingest_and_print(store, &feed, plain);
    print_report(&session, &report, plain);
    Ok(report)
}

/// Replay `feed_path`, then keep processing it as it grows until `shutdown`
/// resolves.
///
/// Growth notifications are handled one at a time; each is refreshed and
/// ingested to completion before the next is received. Returns the combined
/// report of every batch.
///
/// # Errors
///
/// Returns an error if the feed cannot be read initially, the watcher cannot
/// be created, or the notification channel closes.
pub async fn follow<S: LogStorage>(
    store: &mut SessionLogStore<S>,
    feed_path: &Path,
    session: Option<&str>,
    baseline: Baseline,
    plain: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<IngestReport, CommandError> {
    let (mut feed, session) = start(store, feed_path, session, baseline).await?;
    let (_watcher, mut rx) = FeedWatcher::new(feed_path.to_path_buf())?;
    tracing::info!(session = %session, path = %feed_path.display(), "Following feed");

    let mut total = ingest_and_print(store, &feed, plain);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            signal = rx.recv() => match signal {
                Some(FeedSignal::Changed) => match feed.refresh().await {
                    Ok(_) => {
                        let report = ingest_and_print(store, &feed, plain);
                        total.read += report.read;
                        total.accepted += report.accepted;
                        total.rejected += report.rejected;
                        total.replaced |= report.replaced;
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to read feed"),
                },
                Some(FeedSignal::Removed(path)) => {
                    tracing::warn!(path = %path.display(), "Feed file removed, waiting for it to return");
                }
                Some(FeedSignal::Error(e)) => tracing::warn!(error = %e, "Feed watcher error"),
                None => return Err(FeedError::ChannelClosed.into()),
            },
        }
    }

    print_report(&session, &total, plain);
    Ok(total)
}
