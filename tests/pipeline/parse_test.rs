//! Parsing and classification of realistic feed items.

use curation_audit::events::{EventDetails, EventKind, EventParser, Rejection, Severity};
use curation_audit::feed::RawFeedItem;
use serde_json::json;

use super::item;

#[test]
fn test_wire_aliases_parse() {
    let raw: RawFeedItem = serde_json::from_value(json!({
        "type": "TOOL_START",
        "timestamp": "2026-01-29 10:00:00.250",
        "session_id": "s1",
        "details": {"tool_name": "search_genes", "toolArgs": {"query": "brca"}}
    }))
    .expect("feed item");

    let record = EventParser::new().parse(&raw, "s1").expect("accepted");
    assert_eq!(record.kind(), EventKind::ToolStart);
    assert_eq!(record.details.tool_name(), Some("search_genes"));
    assert_eq!(
        record.occurred_at.to_rfc3339(),
        "2026-01-29T10:00:00.250+00:00"
    );
}

#[test]
fn test_rejections_in_priority_order() {
    let parser = EventParser::new();

    let unknown = item("NOT_A_KIND", "s2", json!({}));
    assert_eq!(
        parser.parse(&unknown, "s1").unwrap_err(),
        Rejection::UnknownKind("NOT_A_KIND".to_string())
    );

    let mut missing = item("LLM_CALL", "s1", json!({}));
    missing.session_ref = None;
    assert_eq!(
        parser.parse(&missing, "s1").unwrap_err(),
        Rejection::MissingField("sessionRef")
    );

    let other = item("LLM_CALL", "s2", json!({}));
    assert!(matches!(
        parser.parse(&other, "s1").unwrap_err(),
        Rejection::SessionMismatch { .. }
    ));
}

#[test]
fn test_mistyped_field_keeps_rest_of_payload() {
    let raw = item(
        "DOMAIN_COMPLETED",
        "s1",
        json!({"domain": "genes", "successCount": "3", "totalCount": 4, "success": "yes"}),
    );
    let record = EventParser::new().parse(&raw, "s1").expect("accepted");
    let EventDetails::DomainCompleted(details) = &record.details else {
        panic!("unexpected payload: {:?}", record.details);
    };
    assert_eq!(details.domain.as_deref(), Some("genes"));
    assert_eq!(details.success_count, Some(3));
    assert_eq!(details.total_count, Some(4));
}

#[test]
fn test_error_kind_is_error_even_when_successful() {
    let raw = item("SPECIALIST_ERROR", "s1", json!({"success": true}));
    let record = EventParser::new().parse(&raw, "s1").expect("accepted");
    assert_eq!(record.severity(), Severity::Error);
}

#[test]
fn test_severity_is_deterministic() {
    let raw = item(
        "DOMAIN_COMPLETED",
        "s1",
        json!({"successCount": 2, "totalCount": 3}),
    );
    let parser = EventParser::new();
    let first = parser.parse(&raw, "s1").expect("accepted").severity();
    let second = parser.parse(&raw, "s1").expect("accepted").severity();
    assert_eq!(first, Severity::Warning);
    assert_eq!(first, second);
}

#[test]
fn test_has_error_flag_overrides_error_text() {
    let parser = EventParser::new();

    let flagged = item(
        "SUPERVISOR_RESULT",
        "s1",
        json!({"hasError": false, "error": "stale message"}),
    );
    assert_eq!(
        parser.parse(&flagged, "s1").expect("accepted").severity(),
        Severity::Success
    );

    let unflagged = item("SUPERVISOR_RESULT", "s1", json!({"error": "boom"}));
    assert_eq!(
        parser.parse(&unflagged, "s1").expect("accepted").severity(),
        Severity::Warning
    );
}

#[test]
fn test_failed_tool_with_both_name_spellings_is_a_warning() {
    let raw = item(
        "TOOL_COMPLETE",
        "s1",
        json!({"toolName": "lookup_gene", "tool": "lookup_gene", "success": false}),
    );
    let record = EventParser::new().parse(&raw, "s1").expect("accepted");
    assert_eq!(record.details.tool_name(), Some("lookup_gene"));
    assert_eq!(record.severity(), Severity::Warning);
}
