//! Kind-specific payload shapes.
//!
//! Payloads arrive schema-less. Each kind is narrowed into its own struct on a
//! best-effort basis: missing fields stay `None`, extra fields are ignored and
//! mistyped scalars are coerced where the intent is obvious (`"3"` as a count).
//! Fields the backend spells several ways are folded onto one key first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::EventKind;

/// `SUPERVISOR_START` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorStartDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `SUPERVISOR_DISPATCH` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorDispatchDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub crew_name: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub step: Option<u64>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<u64>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub parallel_count: Option<u64>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub has_error: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `SUPERVISOR_RESULT` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorResultDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub crew_name: Option<String>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub has_error: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `SUPERVISOR_COMPLETE` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorCompleteDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `SUPERVISOR_ERROR` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorErrorDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// `CREW_START` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrewStartDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub crew_name: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub crew_display_name: Option<String>,
    #[serde(deserialize_with = "lenient::names", skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,
}

/// `AGENT_GENERATING` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentGeneratingDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `AGENT_THINKING` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentThinkingDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

/// `AGENT_COMPLETE` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentCompleteDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `TOOL_START` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolStartDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient::any", skip_serializing_if = "Option::is_none")]
    pub call_arguments: Option<Value>,
}

/// `TOOL_COMPLETE` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolCompleteDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `TOOL_RETRY` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolRetryDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u64>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `LLM_CALL` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmCallDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `FORMATTER_PROCESSING` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatterProcessingDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `SPECIALIST_RETRY` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialistRetryDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub specialist: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u64>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `SPECIALIST_ERROR` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialistErrorDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub specialist: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `DOMAIN_PLAN_CREATED` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainPlanCreatedDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::names", skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
}

/// `DOMAIN_EXECUTION_START` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainExecutionStartDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// `DOMAIN_COMPLETED` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainCompletedDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u64>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `DOMAIN_SKIPPED` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainSkippedDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `DOMAIN_CATEGORY_ERROR` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainCategoryErrorDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `FILE_READY` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileReadyDetails {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Payload of an audit record, one variant per [`EventKind`].
///
/// Serializes as the bare payload object; the kind tag is carried by the
/// enclosing record and drives [`EventDetails::from_payload`] on the way back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    SupervisorStart(SupervisorStartDetails),
    SupervisorDispatch(SupervisorDispatchDetails),
    SupervisorResult(SupervisorResultDetails),
    SupervisorComplete(SupervisorCompleteDetails),
    SupervisorError(SupervisorErrorDetails),
    CrewStart(CrewStartDetails),
    AgentGenerating(AgentGeneratingDetails),
    AgentThinking(AgentThinkingDetails),
    AgentComplete(AgentCompleteDetails),
    ToolStart(ToolStartDetails),
    ToolComplete(ToolCompleteDetails),
    ToolRetry(ToolRetryDetails),
    LlmCall(LlmCallDetails),
    FormatterProcessing(FormatterProcessingDetails),
    SpecialistRetry(SpecialistRetryDetails),
    SpecialistError(SpecialistErrorDetails),
    DomainPlanCreated(DomainPlanCreatedDetails),
    DomainExecutionStart(DomainExecutionStartDetails),
    DomainCompleted(DomainCompletedDetails),
    DomainSkipped(DomainSkippedDetails),
    DomainCategoryError(DomainCategoryErrorDetails),
    FileReady(FileReadyDetails),
}

/// Accepted spellings per field: the canonical key, then fallbacks in
/// priority order.
type FieldKeys = &'static [(&'static str, &'static [&'static str])];

/// Alternative keys the backend uses for some fields.
fn field_keys(kind: EventKind) -> FieldKeys {
    match kind {
        EventKind::SupervisorDispatch => &[
            ("crewName", &["crew_name", "crew", "agent"]),
            ("totalSteps", &["total_steps", "total"]),
            ("parallelCount", &["parallel_count"]),
            ("hasError", &["has_error"]),
        ],
        EventKind::SupervisorResult => &[
            ("crewName", &["crew_name", "crew", "agent"]),
            ("hasError", &["has_error"]),
        ],
        EventKind::SupervisorError => &[("error", &["message"])],
        EventKind::CrewStart => &[
            ("crewName", &["crew_name"]),
            ("crewDisplayName", &["crew_display_name", "displayName"]),
        ],
        EventKind::AgentGenerating | EventKind::AgentComplete => {
            &[("agent", &["agent_name", "agentName"])]
        }
        EventKind::AgentThinking => &[
            ("agent", &["agent_name", "agentName"]),
            ("delta", &["content", "text"]),
        ],
        EventKind::ToolStart => &[
            ("toolName", &["tool_name", "tool"]),
            ("friendlyName", &["friendly_name"]),
            ("callArguments", &["call_arguments", "toolArgs", "tool_args", "args"]),
        ],
        EventKind::ToolComplete => &[
            ("toolName", &["tool_name", "tool"]),
            ("friendlyName", &["friendly_name"]),
        ],
        EventKind::ToolRetry => &[
            ("toolName", &["tool_name", "tool"]),
            ("maxAttempts", &["max_attempts", "max_retries"]),
            ("reason", &["error"]),
        ],
        EventKind::SpecialistRetry => &[
            ("specialist", &["specialist_name", "agent"]),
            ("maxAttempts", &["max_attempts", "max_retries"]),
            ("reason", &["error"]),
        ],
        EventKind::SpecialistError => &[("specialist", &["specialist_name", "agent"])],
        EventKind::DomainExecutionStart => &[
            ("position", &["step", "index"]),
            ("total", &["total_domains", "totalDomains"]),
        ],
        EventKind::DomainCompleted => &[
            ("successCount", &["success_count", "succeeded"]),
            ("totalCount", &["total_count", "total"]),
        ],
        EventKind::DomainCategoryError => &[("category", &["domain"])],
        EventKind::FileReady => &[
            ("filename", &["file_name", "fileName"]),
            ("format", &["file_type", "fileType"]),
            ("sizeBytes", &["size_bytes", "size"]),
            ("downloadUrl", &["download_url"]),
        ],
        _ => &[],
    }
}

/// Fold every accepted spelling of a field onto its canonical key.
///
/// The first non-null spelling wins and the others are dropped, so a payload
/// carrying both `error` and `message` still narrows.
fn canonical_keys(kind: EventKind, payload: &Map<String, Value>) -> Value {
    let mut map = payload.clone();
    for (canonical, fallbacks) in field_keys(kind) {
        let mut chosen = map.remove(*canonical).filter(|v| !v.is_null());
        for key in *fallbacks {
            let value = map.remove(*key);
            if chosen.is_none() {
                chosen = value.filter(|v| !v.is_null());
            }
        }
        if let Some(value) = chosen {
            map.insert((*canonical).to_string(), value);
        }
    }
    Value::Object(map)
}

/// Narrow a payload into `T`, falling back to an empty shape.
fn narrow<T>(kind: EventKind, payload: &Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    let Some(map) = payload.as_object() else {
        if !payload.is_null() {
            tracing::debug!(%kind, "Payload is not an object, using empty details");
        }
        return T::default();
    };
    match T::deserialize(&canonical_keys(kind, map)) {
        Ok(details) => details,
        Err(e) => {
            tracing::debug!(%kind, error = %e, "Payload did not narrow, using empty details");
            T::default()
        }
    }
}

impl EventDetails {
    /// Narrow a raw payload into the shape owned by `kind`.
    #[must_use]
    pub fn from_payload(kind: EventKind, payload: &Value) -> Self {
        match kind {
            EventKind::SupervisorStart => Self::SupervisorStart(narrow(kind, payload)),
            EventKind::SupervisorDispatch => Self::SupervisorDispatch(narrow(kind, payload)),
            EventKind::SupervisorResult => Self::SupervisorResult(narrow(kind, payload)),
            EventKind::SupervisorComplete => Self::SupervisorComplete(narrow(kind, payload)),
            EventKind::SupervisorError => Self::SupervisorError(narrow(kind, payload)),
            EventKind::CrewStart => Self::CrewStart(narrow(kind, payload)),
            EventKind::AgentGenerating => Self::AgentGenerating(narrow(kind, payload)),
            EventKind::AgentThinking => Self::AgentThinking(narrow(kind, payload)),
            EventKind::AgentComplete => Self::AgentComplete(narrow(kind, payload)),
            EventKind::ToolStart => Self::ToolStart(narrow(kind, payload)),
            EventKind::ToolComplete => Self::ToolComplete(narrow(kind, payload)),
            EventKind::ToolRetry => Self::ToolRetry(narrow(kind, payload)),
            EventKind::LlmCall => Self::LlmCall(narrow(kind, payload)),
            EventKind::FormatterProcessing => Self::FormatterProcessing(narrow(kind, payload)),
            EventKind::SpecialistRetry => Self::SpecialistRetry(narrow(kind, payload)),
            EventKind::SpecialistError => Self::SpecialistError(narrow(kind, payload)),
            EventKind::DomainPlanCreated => Self::DomainPlanCreated(narrow(kind, payload)),
            EventKind::DomainExecutionStart => Self::DomainExecutionStart(narrow(kind, payload)),
            EventKind::DomainCompleted => Self::DomainCompleted(narrow(kind, payload)),
            EventKind::DomainSkipped => Self::DomainSkipped(narrow(kind, payload)),
            EventKind::DomainCategoryError => Self::DomainCategoryError(narrow(kind, payload)),
            EventKind::FileReady => Self::FileReady(narrow(kind, payload)),
        }
    }

    /// The kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SupervisorStart(_) => EventKind::SupervisorStart,
            Self::SupervisorDispatch(_) => EventKind::SupervisorDispatch,
            Self::SupervisorResult(_) => EventKind::SupervisorResult,
            Self::SupervisorComplete(_) => EventKind::SupervisorComplete,
            Self::SupervisorError(_) => EventKind::SupervisorError,
            Self::CrewStart(_) => EventKind::CrewStart,
            Self::AgentGenerating(_) => EventKind::AgentGenerating,
            Self::AgentThinking(_) => EventKind::AgentThinking,
            Self::AgentComplete(_) => EventKind::AgentComplete,
            Self::ToolStart(_) => EventKind::ToolStart,
            Self::ToolComplete(_) => EventKind::ToolComplete,
            Self::ToolRetry(_) => EventKind::ToolRetry,
            Self::LlmCall(_) => EventKind::LlmCall,
            Self::FormatterProcessing(_) => EventKind::FormatterProcessing,
            Self::SpecialistRetry(_) => EventKind::SpecialistRetry,
            Self::SpecialistError(_) => EventKind::SpecialistError,
            Self::DomainPlanCreated(_) => EventKind::DomainPlanCreated,
            Self::DomainExecutionStart(_) => EventKind::DomainExecutionStart,
            Self::DomainCompleted(_) => EventKind::DomainCompleted,
            Self::DomainSkipped(_) => EventKind::DomainSkipped,
            Self::DomainCategoryError(_) => EventKind::DomainCategoryError,
            Self::FileReady(_) => EventKind::FileReady,
        }
    }

    /// Name of the invoked tool, for tool records.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::ToolStart(d) => d.tool_name.as_deref(),
            Self::ToolComplete(d) => d.tool_name.as_deref(),
            Self::ToolRetry(d) => d.tool_name.as_deref(),
            _ => None,
        }
    }

    /// Outcome flags the severity rules look at.
    #[must_use]
    pub fn outcome(&self) -> Outcome<'_> {
        match self {
            Self::SupervisorDispatch(d) => Outcome {
                has_error: d.has_error,
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::SupervisorResult(d) => Outcome {
                has_error: d.has_error,
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::SupervisorComplete(d) => Outcome {
                success: d.success,
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::SupervisorError(d) => Outcome {
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::AgentComplete(d) => Outcome {
                success: d.success,
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::ToolComplete(d) => Outcome {
                success: d.success,
                error: d.error.as_deref(),
                friendly_name: d.friendly_name.as_deref(),
                ..Outcome::default()
            },
            Self::SpecialistError(d) => Outcome {
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::DomainCompleted(d) => Outcome {
                success: d.success,
                success_count: d.success_count,
                total_count: d.total_count,
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            Self::DomainCategoryError(d) => Outcome {
                error: d.error.as_deref(),
                ..Outcome::default()
            },
            _ => Outcome::default(),
        }
    }
}

/// Success and error indicators carried by a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome<'a> {
    pub success: Option<bool>,
    pub success_count: Option<u64>,
    pub total_count: Option<u64>,
    pub has_error: Option<bool>,
    pub error: Option<&'a str>,
    pub friendly_name: Option<&'a str>,
}

impl Outcome<'_> {
    /// Whether an error message is present and non-blank.
    #[must_use]
    pub fn has_error_text(&self) -> bool {
        self.error.is_some_and(|e| !e.trim().is_empty())
    }

    /// Error indicator for dispatch/result kinds. An explicit `hasError` wins
    /// over the presence of an `error` message.
    #[must_use]
    pub fn error_flag(&self) -> bool {
        self.has_error.unwrap_or_else(|| self.has_error_text())
    }

    /// Whether a completion reports partial or total failure.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        if self.success == Some(false) {
            return true;
        }
        if let (Some(ok), Some(total)) = (self.success_count, self.total_count) {
            if ok < total {
                return true;
            }
        }
        if self.has_error_text() {
            return true;
        }
        self.friendly_name
            .is_some_and(|name| name.to_lowercase().contains("failed"))
    }
}

/// Coercing field deserializers for schema-less payloads.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings as-is, numbers and `true` as text, objects as compact JSON.
    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) => Some(s),
            Value::Bool(true) => Some("true".to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        })
    }

    /// Non-negative integers, also from numeric strings.
    pub fn count<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Booleans, also from `"true"`/`"false"` strings.
    pub fn flag<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    /// Arrays of names. Object entries contribute their `name` field.
    pub fn names<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Object(map) => map
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            Value::String(s) => vec![s],
            _ => Vec::new(),
        })
    }

    /// Any value except `null`.
    pub fn any<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::Null => None,
            other => Some(other),
        })
    }
}
