//! End-to-end tests of the feed to log pipeline.

mod format_test;
mod parse_test;
mod store_test;

use curation_audit::feed::RawFeedItem;
use serde_json::Value;

/// Feed item at a fixed timestamp.
pub fn item(kind: &str, session: &str, payload: Value) -> RawFeedItem {
    RawFeedItem::new(kind, "2026-01-29T10:00:00Z", session, payload)
}

/// Verify the public surface is exported from the library.
#[test]
fn test_public_types_exported() {
    use curation_audit::events::{
        classify, AuditRecord, Category, EventDetails, EventKind, EventParser, Rejection, Severity,
    };
    use curation_audit::feed::{EventFeed, StreamCursor};
    use curation_audit::format::{Label, LabelFormatter};
    use curation_audit::session::{
        Baseline, IngestReport, MemoryStorage, SessionLogStore, SqliteStorage,
    };

    let _ = EventParser::new();
    let _ = LabelFormatter::default();
    let _ = StreamCursor::new();
    let _ = SessionLogStore::new(MemoryStorage::new());
    let _ = SqliteStorage::open_in_memory().expect("in-memory storage");
    let _ = IngestReport::default();
    let _ = Baseline::Auto;
    let _ = Category::Tool;
    let _: fn(EventKind, &EventDetails) -> Severity = classify;
    let _: fn(&AuditRecord) -> EventKind = AuditRecord::kind;
    let _: Option<Label> = None;
    let _: Option<Rejection> = None;
    let empty: Vec<RawFeedItem> = Vec::new();
    assert!(EventFeed::is_empty(&empty));
}
