//! Normalized audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::details::EventDetails;
use super::kind::EventKind;

/// One accepted feed item, normalized and typed.
///
/// Persisted as `{"id", "kind", "occurred_at", "session_ref", "payload"}`. On
/// restore the payload is re-narrowed from `kind`, so the two always agree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct AuditRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// When the backend emitted the event.
    pub occurred_at: DateTime<Utc>,
    /// Session the event belongs to.
    pub session_ref: String,
    /// Kind-specific payload.
    pub details: EventDetails,
}

impl AuditRecord {
    /// Create a record with a fresh ID.
    pub fn new(
        occurred_at: DateTime<Utc>,
        session_ref: impl Into<String>,
        details: EventDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            session_ref: session_ref.into(),
            details,
        }
    }

    /// Kind of the record, derived from its payload.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }
}

#[derive(Deserialize)]
struct StoredRecord {
    id: Uuid,
    kind: EventKind,
    occurred_at: DateTime<Utc>,
    session_ref: String,
    #[serde(default)]
    payload: Value,
}

impl From<StoredRecord> for AuditRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id,
            occurred_at: stored.occurred_at,
            session_ref: stored.session_ref,
            details: EventDetails::from_payload(stored.kind, &stored.payload),
        }
    }
}

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    id: &'a Uuid,
    kind: EventKind,
    occurred_at: &'a DateTime<Utc>,
    session_ref: &'a str,
    payload: &'a EventDetails,
}

impl Serialize for AuditRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredRecordRef {
            id: &self.id,
            kind: self.kind(),
            occurred_at: &self.occurred_at,
            session_ref: &self.session_ref,
            payload: &self.details,
        }
        .serialize(serializer)
    }
}
