//! Human-readable labels for audit records.

mod args;
mod body;
mod render;

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::config::FormatConfig;
use crate::events::{AuditRecord, Category};

pub use args::format_call_arguments;
pub use render::{render_value, truncate, RenderLimits, REDACTED, TRUNCATION_MARKER};

/// Prefix and body text of one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Bracketed category tag, e.g. `[TOOL]`.
    pub prefix: &'static str,
    /// Possibly multi-line description.
    pub body: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.body)
    }
}

/// Produces [`Label`]s for records. Pure: same record, same label.
#[derive(Debug, Clone)]
pub struct LabelFormatter {
    limits: RenderLimits,
    agent_tools: Vec<Regex>,
    hidden_argument_tools: HashSet<String>,
}

impl LabelFormatter {
    /// Build a formatter from configuration.
    ///
    /// Agent tool patterns that fail to compile are skipped with a warning;
    /// the config loader rejects them up front.
    #[must_use]
    pub fn new(config: &FormatConfig) -> Self {
        let agent_tools = config
            .agent_tool_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(%pattern, error = %e, "Ignoring invalid agent tool pattern");
                    None
                }
            })
            .collect();

        Self {
            limits: RenderLimits::from_config(config),
            agent_tools,
            hidden_argument_tools: config.hidden_argument_tools.iter().cloned().collect(),
        }
    }

    /// Rendering budgets in effect.
    #[must_use]
    pub fn limits(&self) -> &RenderLimits {
        &self.limits
    }

    /// Whether `tool` is a specialist agent invoked through the tool mechanism.
    #[must_use]
    pub fn is_agent_tool(&self, tool: &str) -> bool {
        self.agent_tools.iter().any(|re| re.is_match(tool))
    }

    /// Whether the call arguments of `tool` are bulk data not worth showing.
    #[must_use]
    pub fn hides_arguments(&self, tool: &str) -> bool {
        self.hidden_argument_tools.contains(tool)
    }

    /// Category of a record after the agent-as-tool override.
    #[must_use]
    pub fn category(&self, record: &AuditRecord) -> Category {
        match (record.kind().category(), record.details.tool_name()) {
            (Category::Tool, Some(tool)) if self.is_agent_tool(tool) => Category::Agent,
            (category, _) => category,
        }
    }

    /// Bracketed prefix of a record.
    #[must_use]
    pub fn prefix(&self, record: &AuditRecord) -> &'static str {
        self.category(record).prefix()
    }

    /// Body text of a record.
    #[must_use]
    pub fn body(&self, record: &AuditRecord) -> String {
        body::body(&record.details, self)
    }

    /// Prefix and body of a record.
    #[must_use]
    pub fn label(&self, record: &AuditRecord) -> Label {
        Label {
            prefix: self.prefix(record),
            body: self.body(record),
        }
    }
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::new(&FormatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventDetails, EventKind};
    use chrono::Utc;
    use serde_json::{json, Value};

    fn record(kind: EventKind, payload: Value) -> AuditRecord {
        AuditRecord::new(Utc::now(), "s1", EventDetails::from_payload(kind, &payload))
    }

    #[test]
    fn test_specialist_tool_is_agent() {
        let fmt = LabelFormatter::default();
        let rec = record(EventKind::ToolStart, json!({"toolName": "ask_pdf_specialist"}));
        assert_eq!(fmt.prefix(&rec), "[AGENT]");

        let rec = record(
            EventKind::ToolComplete,
            json!({"toolName": "ask_gene_expression_specialist"}),
        );
        assert_eq!(fmt.prefix(&rec), "[AGENT]");
    }

    #[test]
    fn test_plain_tool_stays_tool() {
        let fmt = LabelFormatter::default();
        let rec = record(EventKind::ToolStart, json!({"toolName": "search_document"}));
        assert_eq!(fmt.prefix(&rec), "[TOOL]");
        let rec = record(EventKind::ToolStart, json!({}));
        assert_eq!(fmt.prefix(&rec), "[TOOL]");
    }

    #[test]
    fn test_custom_agent_patterns() {
        let config = FormatConfig {
            agent_tool_patterns: vec!["^transfer_to_".to_string(), "(bad".to_string()],
            ..FormatConfig::default()
        };
        let fmt = LabelFormatter::new(&config);
        assert!(fmt.is_agent_tool("transfer_to_pdf"));
        assert!(!fmt.is_agent_tool("ask_pdf_specialist"));
    }

    #[test]
    fn test_label_display() {
        let fmt = LabelFormatter::default();
        let rec = record(EventKind::SupervisorStart, json!({"message": "go"}));
        assert_eq!(fmt.label(&rec).to_string(), "[SUPERVISOR] go");
    }

    #[test]
    fn test_label_is_deterministic() {
        let fmt = LabelFormatter::default();
        let rec = record(
            EventKind::ToolStart,
            json!({"toolName": "api_call", "args": {"endpoint": "/x", "params": {"b": [1, 2], "a": {"c": 1}}}}),
        );
        assert_eq!(fmt.label(&rec), fmt.label(&rec));
    }
}
