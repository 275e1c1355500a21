//! Conversion of raw feed items into audit records.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::feed::RawFeedItem;

use super::details::EventDetails;
use super::kind::EventKind;
use super::record::AuditRecord;

/// Why a feed item did not become a record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Kind is not in the registry.
    #[error("Unrecognized event kind: {0}")]
    UnknownKind(String),

    /// Kind is legal but excluded from the log.
    #[error("Event kind {0} is not displayed")]
    Hidden(EventKind),

    /// A required field is absent.
    #[error("Feed item missing required field: {0}")]
    MissingField(&'static str),

    /// `occurredAt` is not a timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Item belongs to another session.
    #[error("Event for session {found} does not match active session {active}")]
    SessionMismatch { active: String, found: String },
}

impl Rejection {
    /// Whether the drop is expected noise rather than a malformed or
    /// misrouted item.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::UnknownKind(_) | Self::Hidden(_))
    }
}

/// Parse a timestamp as RFC 3339, or as a naive datetime taken to be UTC.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Turns raw feed items into records for one active session.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventParser;

impl EventParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Convert `item` into a record owned by `active_session`.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the item is not displayable, incomplete,
    /// or addressed to a different session.
    pub fn parse(&self, item: &RawFeedItem, active_session: &str) -> Result<AuditRecord, Rejection> {
        let kind: EventKind = item
            .kind
            .parse()
            .map_err(|_| Rejection::UnknownKind(item.kind.clone()))?;
        if !kind.is_displayed() {
            return Err(Rejection::Hidden(kind));
        }

        let occurred_at = item
            .occurred_at
            .as_deref()
            .ok_or(Rejection::MissingField("occurredAt"))?;
        let session_ref = item
            .session_ref
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(Rejection::MissingField("sessionRef"))?;

        if session_ref != active_session {
            return Err(Rejection::SessionMismatch {
                active: active_session.to_string(),
                found: session_ref.to_string(),
            });
        }

        let occurred_at = parse_timestamp(occurred_at)
            .ok_or_else(|| Rejection::InvalidTimestamp(occurred_at.to_string()))?;

        Ok(AuditRecord::new(
            occurred_at,
            session_ref,
            EventDetails::from_payload(kind, &item.payload),
        ))
    }

    /// Like [`EventParser::parse`], logging the rejection and discarding it.
    #[must_use]
    pub fn accept(&self, item: &RawFeedItem, active_session: &str) -> Option<AuditRecord> {
        match self.parse(item, active_session) {
            Ok(record) => Some(record),
            Err(rejection) if rejection.is_silent() => {
                tracing::debug!(kind = %item.kind, %rejection, "Dropping feed item");
                None
            }
            Err(rejection) => {
                tracing::warn!(
                    kind = %item.kind,
                    session = active_session,
                    %rejection,
                    "Dropping feed item"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(kind: &str, session: &str) -> RawFeedItem {
        RawFeedItem::new(kind, "2026-01-29T10:00:00Z", session, json!({"message": "go"}))
    }

    #[test]
    fn test_parse_accepts_displayed_kind() {
        let record = EventParser::new()
            .parse(&item("SUPERVISOR_START", "s1"), "s1")
            .unwrap();
        assert_eq!(record.kind(), EventKind::SupervisorStart);
        assert_eq!(record.session_ref, "s1");
        assert_eq!(record.occurred_at.to_rfc3339(), "2026-01-29T10:00:00+00:00");
    }

    #[test]
    fn test_parse_drops_thinking() {
        let err = EventParser::new()
            .parse(&item("AGENT_THINKING", "s1"), "s1")
            .unwrap_err();
        assert_eq!(err, Rejection::Hidden(EventKind::AgentThinking));
        assert!(err.is_silent());
    }

    #[test]
    fn test_parse_drops_unknown_kind() {
        let err = EventParser::new()
            .parse(&item("HEARTBEAT", "s1"), "s1")
            .unwrap_err();
        assert_eq!(err, Rejection::UnknownKind("HEARTBEAT".to_string()));
        assert!(err.is_silent());
    }

    #[test]
    fn test_parse_requires_timestamp() {
        let mut raw = item("LLM_CALL", "s1");
        raw.occurred_at = None;
        let err = EventParser::new().parse(&raw, "s1").unwrap_err();
        assert_eq!(err, Rejection::MissingField("occurredAt"));
        assert!(!err.is_silent());
    }

    #[test]
    fn test_parse_requires_session() {
        let mut raw = item("LLM_CALL", "s1");
        raw.session_ref = Some(String::new());
        let err = EventParser::new().parse(&raw, "s1").unwrap_err();
        assert_eq!(err, Rejection::MissingField("sessionRef"));
    }

    #[test]
    fn test_parse_rejects_other_session() {
        let err = EventParser::new()
            .parse(&item("LLM_CALL", "s2"), "s1")
            .unwrap_err();
        assert!(matches!(err, Rejection::SessionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Event for session s2 does not match active session s1"
        );
    }

    #[test]
    fn test_parse_rejects_bad_timestamp() {
        let mut raw = item("LLM_CALL", "s1");
        raw.occurred_at = Some("yesterday".to_string());
        let err = EventParser::new().parse(&raw, "s1").unwrap_err();
        assert_eq!(err, Rejection::InvalidTimestamp("yesterday".to_string()));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-01-29T10:00:00.123Z").is_some());
        assert!(parse_timestamp("2026-01-29T12:00:00+02:00").is_some());
        assert_eq!(
            parse_timestamp("2026-01-29T10:00:00.5"),
            parse_timestamp("2026-01-29T10:00:00.5Z")
        );
        assert!(parse_timestamp("2026-01-29 10:00:00").is_some());
        assert!(parse_timestamp("not a time").is_none());
    }

    #[test]
    fn test_accept_returns_none_on_rejection() {
        let parser = EventParser::new();
        assert!(parser.accept(&item("AGENT_THINKING", "s1"), "s1").is_none());
        assert!(parser.accept(&item("LLM_CALL", "s2"), "s1").is_none());
        assert!(parser.accept(&item("LLM_CALL", "s1"), "s1").is_some());
    }
}
