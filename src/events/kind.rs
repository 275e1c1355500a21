//! Registry of event kinds emitted by the agent backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind tag of a feed item.
///
/// The set is closed: tags outside it are dropped by the parser. Every kind
/// has exactly one payload shape in [`EventDetails`](super::EventDetails).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SupervisorStart,
    SupervisorDispatch,
    SupervisorResult,
    SupervisorComplete,
    SupervisorError,
    CrewStart,
    AgentGenerating,
    /// Per-token reasoning stream. Legal on the feed, never displayed.
    AgentThinking,
    AgentComplete,
    ToolStart,
    ToolComplete,
    ToolRetry,
    LlmCall,
    FormatterProcessing,
    SpecialistRetry,
    SpecialistError,
    DomainPlanCreated,
    DomainExecutionStart,
    DomainCompleted,
    DomainSkipped,
    DomainCategoryError,
    FileReady,
}

impl EventKind {
    /// Every recognized kind, in registry order.
    pub const ALL: [EventKind; 22] = [
        Self::SupervisorStart,
        Self::SupervisorDispatch,
        Self::SupervisorResult,
        Self::SupervisorComplete,
        Self::SupervisorError,
        Self::CrewStart,
        Self::AgentGenerating,
        Self::AgentThinking,
        Self::AgentComplete,
        Self::ToolStart,
        Self::ToolComplete,
        Self::ToolRetry,
        Self::LlmCall,
        Self::FormatterProcessing,
        Self::SpecialistRetry,
        Self::SpecialistError,
        Self::DomainPlanCreated,
        Self::DomainExecutionStart,
        Self::DomainCompleted,
        Self::DomainSkipped,
        Self::DomainCategoryError,
        Self::FileReady,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SupervisorStart => "SUPERVISOR_START",
            Self::SupervisorDispatch => "SUPERVISOR_DISPATCH",
            Self::SupervisorResult => "SUPERVISOR_RESULT",
            Self::SupervisorComplete => "SUPERVISOR_COMPLETE",
            Self::SupervisorError => "SUPERVISOR_ERROR",
            Self::CrewStart => "CREW_START",
            Self::AgentGenerating => "AGENT_GENERATING",
            Self::AgentThinking => "AGENT_THINKING",
            Self::AgentComplete => "AGENT_COMPLETE",
            Self::ToolStart => "TOOL_START",
            Self::ToolComplete => "TOOL_COMPLETE",
            Self::ToolRetry => "TOOL_RETRY",
            Self::LlmCall => "LLM_CALL",
            Self::FormatterProcessing => "FORMATTER_PROCESSING",
            Self::SpecialistRetry => "SPECIALIST_RETRY",
            Self::SpecialistError => "SPECIALIST_ERROR",
            Self::DomainPlanCreated => "DOMAIN_PLAN_CREATED",
            Self::DomainExecutionStart => "DOMAIN_EXECUTION_START",
            Self::DomainCompleted => "DOMAIN_COMPLETED",
            Self::DomainSkipped => "DOMAIN_SKIPPED",
            Self::DomainCategoryError => "DOMAIN_CATEGORY_ERROR",
            Self::FileReady => "FILE_READY",
        }
    }

    /// Whether records of this kind belong in the activity log.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        !matches!(self, Self::AgentThinking)
    }

    /// Category tag shown in front of the body text.
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::SupervisorStart
            | Self::SupervisorDispatch
            | Self::SupervisorResult
            | Self::SupervisorComplete
            | Self::SupervisorError => Category::Supervisor,
            Self::CrewStart => Category::Crew,
            Self::AgentGenerating | Self::AgentComplete => Category::Agent,
            Self::AgentThinking => Category::Thinking,
            Self::ToolStart | Self::ToolComplete | Self::ToolRetry => Category::Tool,
            Self::LlmCall => Category::Llm,
            Self::FormatterProcessing => Category::Formatter,
            Self::SpecialistRetry | Self::SpecialistError => Category::Specialist,
            Self::DomainPlanCreated
            | Self::DomainExecutionStart
            | Self::DomainCompleted
            | Self::DomainSkipped
            | Self::DomainCategoryError => Category::Domain,
            Self::FileReady => Category::File,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tag is not in the registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Display category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Supervisor,
    Crew,
    Agent,
    Thinking,
    Tool,
    Llm,
    Formatter,
    Specialist,
    Domain,
    File,
}

impl Category {
    /// Bracketed prefix for log lines.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Supervisor => "[SUPERVISOR]",
            Self::Crew => "[CREW]",
            Self::Agent => "[AGENT]",
            Self::Thinking => "[THINKING]",
            Self::Tool => "[TOOL]",
            Self::Llm => "[LLM]",
            Self::Formatter => "[FORMATTER]",
            Self::Specialist => "[SPECIALIST]",
            Self::Domain => "[DOMAIN]",
            Self::File => "[FILE]",
        }
    }
}
