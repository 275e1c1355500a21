//! Per-session ordered log of accepted records.
//!
//! Exactly one session is active at a time. Its records and its feed position
//! are mirrored to a [`LogStorage`] after every change so that reactivating the
//! session, in this process or a later one, restores the same list and resumes
//! reading where it stopped. Storage failures are logged and otherwise
//! ignored; the in-memory log stays authoritative.

use std::fmt;

use crate::events::{AuditRecord, EventParser, Severity};
use crate::feed::{EventFeed, StreamCursor};
use crate::format::{Label, LabelFormatter};

use super::clipboard::ClipboardSink;
use super::storage::LogStorage;

/// Where the cursor starts when a session is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    /// Resume at the session's stored feed position, or read the feed from
    /// the start if none was stored.
    #[default]
    Auto,
    /// Read the feed from the start.
    Start,
    /// Skip the first `n` items.
    At(usize),
}

/// Outcome of one [`SessionLogStore::ingest`] batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Feed items examined.
    pub read: usize,
    /// Items that became records.
    pub accepted: usize,
    /// Items dropped by the parser.
    pub rejected: usize,
    /// The feed had shrunk below the cursor and was reread from the start.
    pub replaced: bool,
}

/// Display view of one record.
#[derive(Debug, Clone)]
pub struct LogEntry<'a> {
    pub record: &'a AuditRecord,
    pub severity: Severity,
    pub label: Label,
}

struct ActiveLog {
    session: String,
    records: Vec<AuditRecord>,
    cursor: StreamCursor,
}

type ClearCallback = Box<dyn FnMut() + Send>;

/// Owns the active session's log, its feed cursor and its durable copy.
pub struct SessionLogStore<S: LogStorage> {
    storage: S,
    parser: EventParser,
    formatter: LabelFormatter,
    active: Option<ActiveLog>,
    on_clear: Option<ClearCallback>,
}

impl<S: LogStorage> fmt::Debug for SessionLogStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLogStore")
            .field("session", &self.active_session())
            .field("records", &self.records().len())
            .field("cursor", &self.cursor())
            .field("on_clear", &self.on_clear.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: LogStorage> SessionLogStore<S> {
    /// Create an inactive store with the default formatter.
    pub fn new(storage: S) -> Self {
        Self::with_formatter(storage, LabelFormatter::default())
    }

    /// Create an inactive store that labels records with `formatter`.
    pub fn with_formatter(storage: S, formatter: LabelFormatter) -> Self {
        Self {
            storage,
            parser: EventParser::new(),
            formatter,
            active: None,
            on_clear: None,
        }
    }

    /// Register a callback invoked after every [`SessionLogStore::clear`].
    pub fn on_clear(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_clear = Some(Box::new(callback));
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn formatter(&self) -> &LabelFormatter {
        &self.formatter
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active_session(&self) -> Option<&str> {
        self.active.as_ref().map(|log| log.session.as_str())
    }

    /// Records of the active session in acceptance order. Empty when inactive.
    #[must_use]
    pub fn records(&self) -> &[AuditRecord] {
        self.active.as_ref().map_or(&[][..], |log| log.records.as_slice())
    }

    #[must_use]
    pub fn cursor(&self) -> Option<StreamCursor> {
        self.active.as_ref().map(|log| log.cursor)
    }

    /// Make `session` the active session.
    ///
    /// Restores its durable copy when one exists. The previous session is
    /// detached; its durable copy is left as is. Activating the session that
    /// is already active changes nothing.
    ///
    /// Returns whether a durable copy was restored.
    pub fn activate<F: EventFeed + ?Sized>(
        &mut self,
        session: &str,
        feed: &F,
        baseline: Baseline,
    ) -> bool {
        if self.active_session() == Some(session) {
            tracing::debug!(session, "Session already active");
            return false;
        }

        let restored = match self.storage.get(session) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(session, error = %e, "Failed to read session log, starting empty");
                None
            }
        };
        let was_restored = restored.is_some();
        let records = restored.unwrap_or_default();

        let cursor = match baseline {
            Baseline::Auto => match self.storage.position(session) {
                Ok(Some(position)) => StreamCursor::at(position),
                Ok(None) => StreamCursor::new(),
                Err(e) => {
                    tracing::warn!(session, error = %e, "Failed to read feed position");
                    // Rereading would duplicate the restored records.
                    if was_restored {
                        StreamCursor::caught_up(feed)
                    } else {
                        StreamCursor::new()
                    }
                }
            },
            Baseline::Start => StreamCursor::new(),
            Baseline::At(n) => StreamCursor::at(n),
        };

        tracing::info!(
            session,
            restored = records.len(),
            cursor = cursor.position(),
            "Activated session log"
        );

        self.active = Some(ActiveLog {
            session: session.to_string(),
            records,
            cursor,
        });
        was_restored
    }

    /// Detach the active session, keeping its durable copy.
    pub fn deactivate(&mut self) {
        if let Some(log) = self.active.take() {
            tracing::info!(session = %log.session, records = log.records.len(), "Deactivated session log");
        }
    }

    /// Append `record` if it belongs to the active session, then persist.
    ///
    /// Returns whether the record was appended.
    pub fn append(&mut self, record: AuditRecord) -> bool {
        let Some(log) = self.active.as_mut() else {
            tracing::debug!(session = %record.session_ref, "No active session, dropping record");
            return false;
        };
        if record.session_ref != log.session {
            tracing::warn!(
                active = %log.session,
                found = %record.session_ref,
                "Dropping record for another session"
            );
            return false;
        }

        log.records.push(record);
        self.persist();
        true
    }

    /// Read the unconsumed part of `feed` into the active log.
    ///
    /// The cursor moves only after every item of the batch has been handled,
    /// and is persisted together with any records the batch accepted.
    /// Inactive stores read nothing.
    pub fn ingest<F: EventFeed + ?Sized>(&mut self, feed: &F) -> IngestReport {
        let parser = self.parser;
        let Some(log) = self.active.as_mut() else {
            return IngestReport::default();
        };

        let drained = log.cursor.drain(feed);
        let mut report = IngestReport {
            read: drained.items.len(),
            replaced: drained.replaced,
            ..IngestReport::default()
        };

        for item in drained.items {
            match parser.accept(item, &log.session) {
                Some(record) => {
                    log.records.push(record);
                    report.accepted += 1;
                }
                None => report.rejected += 1,
            }
        }

        let next = drained.next;
        let moved = next != log.cursor;
        log.cursor = next;
        if report.accepted > 0 {
            self.persist();
        } else if moved {
            self.persist_position();
        }

        if report.read > 0 {
            tracing::debug!(
                read = report.read,
                accepted = report.accepted,
                rejected = report.rejected,
                cursor = next.position(),
                "Ingested feed batch"
            );
        }
        report
    }

    /// Empty the active log, delete its durable copy, and skip everything
    /// currently in `feed`.
    ///
    /// The skipped position is persisted, so the cleared items stay
    /// acknowledged when the session is reactivated later.
    pub fn clear<F: EventFeed + ?Sized>(&mut self, feed: &F) {
        let Some(log) = self.active.as_mut() else {
            tracing::debug!("No active session to clear");
            return;
        };

        log.records.clear();
        log.cursor = StreamCursor::caught_up(feed);
        if let Err(e) = self.storage.delete(&log.session) {
            tracing::warn!(session = %log.session, error = %e, "Failed to delete session log");
        }
        if let Err(e) = self.storage.put_position(&log.session, log.cursor.position()) {
            tracing::warn!(session = %log.session, error = %e, "Failed to persist feed position");
        }
        tracing::info!(session = %log.session, cursor = log.cursor.position(), "Cleared session log");

        if let Some(callback) = self.on_clear.as_mut() {
            callback();
        }
    }

    /// Severity and label of every record, in log order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry<'_>> {
        self.entries_from(0)
    }

    /// Severity and label of the records from index `start` on. Empty when
    /// `start` is past the end.
    #[must_use]
    pub fn entries_from(&self, start: usize) -> Vec<LogEntry<'_>> {
        self.records()
            .get(start..)
            .unwrap_or_default()
            .iter()
            .map(|record| LogEntry {
                record,
                severity: record.severity(),
                label: self.formatter.label(record),
            })
            .collect()
    }

    /// One `prefix body` line per record, newline-joined.
    #[must_use]
    pub fn copy_text(&self) -> String {
        self.records()
            .iter()
            .map(|record| self.formatter.label(record).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Deliver [`SessionLogStore::copy_text`] to `sink`.
    ///
    /// Returns whether the sink accepted the text; failures are only logged.
    pub fn copy_to(&self, sink: &mut dyn ClipboardSink) -> bool {
        match sink.write_text(&self.copy_text()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Copy failed");
                false
            }
        }
    }

    fn persist(&mut self) {
        let Some(log) = self.active.as_ref() else {
            return;
        };
        if let Err(e) = self.storage.put(&log.session, &log.records, log.cursor.position()) {
            tracing::warn!(session = %log.session, error = %e, "Failed to persist session log");
        }
    }

    fn persist_position(&mut self) {
        let Some(log) = self.active.as_ref() else {
            return;
        };
        if let Err(e) = self.storage.put_position(&log.session, log.cursor.position()) {
            tracing::warn!(session = %log.session, error = %e, "Failed to persist feed position");
        }
    }
}
