//! Session log lifecycle over a growing feed.

use curation_audit::events::Severity;
use curation_audit::feed::{RawFeedItem, StreamCursor};
use curation_audit::session::{Baseline, MemoryStorage, SessionLogStore};
use serde_json::json;

use super::item;

fn start(session: &str, message: &str) -> RawFeedItem {
    item("SUPERVISOR_START", session, json!({"message": message}))
}

#[test]
fn test_monotonic_cursor_over_growth() {
    let mut feed = vec![start("s1", "a"), start("s1", "b")];
    let mut store = SessionLogStore::new(MemoryStorage::new());
    store.activate("s1", &feed, Baseline::At(1));
    let first = store.cursor().expect("active").position();

    let mut read = 0;
    for round in 0..5 {
        read += store.ingest(&feed).read;
        for n in 0..round {
            feed.push(start("s1", &format!("{round}-{n}")));
        }
    }
    read += store.ingest(&feed).read;

    assert_eq!(read, feed.len() - first);
    assert_eq!(store.records().len(), read);
}

#[test]
fn test_sessions_never_mix() {
    let feed = vec![
        start("s1", "a"),
        start("s2", "b"),
        item("TOOL_START", "s2", json!({"toolName": "x"})),
        start("s1", "c"),
    ];
    let mut store = SessionLogStore::new(MemoryStorage::new());

    store.activate("s1", &feed, Baseline::Start);
    store.ingest(&feed);
    store.activate("s2", &feed, Baseline::Start);
    store.ingest(&feed);
    assert!(store.records().iter().all(|r| r.session_ref == "s2"));

    store.activate("s1", &feed, Baseline::Auto);
    assert_eq!(store.records().len(), 2);
    assert!(store.records().iter().all(|r| r.session_ref == "s1"));
}

#[test]
fn test_clear_then_growth_only_shows_new_items() {
    let mut feed = vec![start("s1", "old")];
    let mut store = SessionLogStore::new(MemoryStorage::new());
    store.activate("s1", &feed, Baseline::Start);
    store.ingest(&feed);

    store.clear(&feed);
    assert_eq!(store.cursor(), Some(StreamCursor::at(1)));

    feed.push(start("s1", "new"));
    store.ingest(&feed);
    assert_eq!(store.copy_text(), "[SUPERVISOR] new");
}

#[test]
fn test_entries_carry_severity_and_label() {
    let feed = vec![
        start("s1", "go"),
        item("TOOL_RETRY", "s1", json!({"toolName": "search", "attempt": 2, "maxAttempts": 3})),
        item("SUPERVISOR_ERROR", "s1", json!({"error": "boom"})),
    ];
    let mut store = SessionLogStore::new(MemoryStorage::new());
    store.activate("s1", &feed, Baseline::Start);
    store.ingest(&feed);

    let severities: Vec<Severity> = store.entries().iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Info, Severity::Warning, Severity::Error]
    );
    let lines: Vec<String> = store
        .entries()
        .iter()
        .map(|e| e.label.to_string())
        .collect();
    assert_eq!(lines[1], "[TOOL] Retrying search (attempt 2/3)");
    assert_eq!(lines[2], "[SUPERVISOR] boom");
}

#[test]
fn test_switching_back_and_forth_neither_drops_nor_repeats() {
    let mut feed = vec![start("s1", "old1"), start("s1", "old2")];
    let mut store = SessionLogStore::new(MemoryStorage::new());

    store.activate("s1", &feed, Baseline::Auto);
    store.ingest(&feed);
    store.clear(&feed);

    store.activate("s2", &feed, Baseline::Auto);
    feed.push(start("s1", "while-away"));
    feed.push(start("s2", "mine"));
    store.ingest(&feed);
    assert_eq!(store.copy_text(), "[SUPERVISOR] mine");

    store.activate("s1", &feed, Baseline::Auto);
    let report = store.ingest(&feed);
    assert_eq!(report.read, 2);
    assert_eq!(store.copy_text(), "[SUPERVISOR] while-away");
}
