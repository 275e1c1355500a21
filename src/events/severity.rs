//! Severity classification of audit records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::details::EventDetails;
use super::kind::EventKind;
use super::record::AuditRecord;

/// Display classification of a record. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Processing,
}

impl Severity {
    /// Returns the lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a kind and payload. Rules are checked in order, first match wins.
#[must_use]
pub fn classify(kind: EventKind, details: &EventDetails) -> Severity {
    use EventKind as K;

    if kind.as_str().contains("ERROR") {
        return Severity::Error;
    }

    let outcome = details.outcome();
    match kind {
        K::AgentGenerating | K::FormatterProcessing => Severity::Processing,
        K::ToolRetry | K::SpecialistRetry => Severity::Warning,
        K::SupervisorComplete | K::AgentComplete | K::ToolComplete | K::DomainCompleted => {
            if outcome.is_partial_failure() {
                Severity::Warning
            } else {
                Severity::Success
            }
        }
        K::SupervisorStart | K::CrewStart | K::ToolStart | K::DomainExecutionStart | K::LlmCall => {
            Severity::Info
        }
        K::SupervisorResult | K::SupervisorDispatch if outcome.error_flag() => Severity::Warning,
        K::SupervisorResult => Severity::Success,
        K::SupervisorDispatch => Severity::Info,
        K::FileReady => Severity::Success,
        _ => Severity::Info,
    }
}

impl AuditRecord {
    /// Severity of this record under the current rules.
    #[must_use]
    pub fn severity(&self) -> Severity {
        classify(self.kind(), &self.details)
    }
}
