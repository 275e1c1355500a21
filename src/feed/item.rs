//! Raw feed items and the inbound feed contract.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One untyped event as delivered by the transport.
///
/// Backends spell the envelope fields several ways (`type`, `timestamp`,
/// `session_id`, `details`). The first present spelling of each field wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RawFeedItem {
    /// Kind tag, e.g. `TOOL_START`.
    pub kind: String,
    /// Emission time as text.
    #[serde(rename = "occurredAt")]
    pub occurred_at: Option<String>,
    /// Session the event belongs to.
    #[serde(rename = "sessionRef")]
    pub session_ref: Option<String>,
    /// Kind-specific payload.
    pub payload: Value,
}

const KIND_KEYS: &[&str] = &["kind", "type"];
const OCCURRED_AT_KEYS: &[&str] = &["occurredAt", "occurred_at", "timestamp"];
const SESSION_KEYS: &[&str] = &["sessionRef", "session_ref", "session_id", "sessionId"];
const PAYLOAD_KEYS: &[&str] = &["payload", "details", "data"];

/// First non-null value among `keys`.
fn first_of(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| map.remove(*key))
        .find(|value| !value.is_null())
}

fn text_of(map: &mut Map<String, Value>, keys: &[&str]) -> Result<Option<String>, String> {
    match first_of(map, keys) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(format!("invalid type for `{}`: {other}", keys[0])),
    }
}

impl TryFrom<Map<String, Value>> for RawFeedItem {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let kind = text_of(&mut map, KIND_KEYS)?.ok_or_else(|| "missing field `kind`".to_string())?;
        Ok(Self {
            kind,
            occurred_at: text_of(&mut map, OCCURRED_AT_KEYS)?,
            session_ref: text_of(&mut map, SESSION_KEYS)?,
            payload: first_of(&mut map, PAYLOAD_KEYS).unwrap_or(Value::Null),
        })
    }
}

impl RawFeedItem {
    /// Create a fully populated item.
    pub fn new(
        kind: impl Into<String>,
        occurred_at: impl Into<String>,
        session_ref: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            kind: kind.into(),
            occurred_at: Some(occurred_at.into()),
            session_ref: Some(session_ref.into()),
            payload,
        }
    }
}

/// Ordered, append-only sequence of feed items.
///
/// Implementors only ever grow, except when the whole stream is replaced; a
/// cursor beyond [`EventFeed::len`] signals that case.
pub trait EventFeed {
    /// Current number of items.
    fn len(&self) -> usize;

    /// Items in `range`. The range is always within `0..len()`.
    fn slice(&self, range: Range<usize>) -> &[RawFeedItem];

    /// Whether the feed has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventFeed for [RawFeedItem] {
    fn len(&self) -> usize {
        <[RawFeedItem]>::len(self)
    }

    fn slice(&self, range: Range<usize>) -> &[RawFeedItem] {
        &self[range]
    }
}

impl EventFeed for Vec<RawFeedItem> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn slice(&self, range: Range<usize>) -> &[RawFeedItem] {
        &self[range]
    }
}
