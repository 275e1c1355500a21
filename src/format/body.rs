//! Per-kind body text.
//!
//! One pure function per kind; [`body`] is the dispatch table.

use crate::events::{
    AgentCompleteDetails, AgentGeneratingDetails, AgentThinkingDetails, CrewStartDetails,
    DomainCategoryErrorDetails, DomainCompletedDetails, DomainExecutionStartDetails,
    DomainPlanCreatedDetails, DomainSkippedDetails, EventDetails, FileReadyDetails,
    FormatterProcessingDetails, LlmCallDetails, SpecialistErrorDetails, SpecialistRetryDetails,
    SupervisorCompleteDetails, SupervisorDispatchDetails, SupervisorErrorDetails,
    SupervisorResultDetails, SupervisorStartDetails, ToolCompleteDetails, ToolRetryDetails,
    ToolStartDetails,
};

use super::args::format_call_arguments;
use super::render::truncate;
use super::LabelFormatter;

/// Names listed inline before collapsing into `+N more`.
const MAX_INLINE_NAMES: usize = 5;

/// Body text for any record payload.
pub(super) fn body(details: &EventDetails, fmt: &LabelFormatter) -> String {
    match details {
        EventDetails::SupervisorStart(d) => supervisor_start(d),
        EventDetails::SupervisorDispatch(d) => supervisor_dispatch(d, fmt),
        EventDetails::SupervisorResult(d) => supervisor_result(d, fmt),
        EventDetails::SupervisorComplete(d) => supervisor_complete(d, fmt),
        EventDetails::SupervisorError(d) => supervisor_error(d, fmt),
        EventDetails::CrewStart(d) => crew_start(d),
        EventDetails::AgentGenerating(d) => agent_generating(d),
        EventDetails::AgentThinking(d) => agent_thinking(d, fmt),
        EventDetails::AgentComplete(d) => agent_complete(d, fmt),
        EventDetails::ToolStart(d) => tool_start(d, fmt),
        EventDetails::ToolComplete(d) => tool_complete(d, fmt),
        EventDetails::ToolRetry(d) => tool_retry(d, fmt),
        EventDetails::LlmCall(d) => llm_call(d),
        EventDetails::FormatterProcessing(d) => formatter_processing(d),
        EventDetails::SpecialistRetry(d) => specialist_retry(d, fmt),
        EventDetails::SpecialistError(d) => specialist_error(d, fmt),
        EventDetails::DomainPlanCreated(d) => domain_plan_created(d),
        EventDetails::DomainExecutionStart(d) => domain_execution_start(d),
        EventDetails::DomainCompleted(d) => domain_completed(d, fmt),
        EventDetails::DomainSkipped(d) => domain_skipped(d, fmt),
        EventDetails::DomainCategoryError(d) => domain_category_error(d, fmt),
        EventDetails::FileReady(d) => file_ready(d),
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// `step X/Y`, or `step X` when the total is unknown.
fn position(step: Option<u64>, total: Option<u64>) -> Option<String> {
    match (step, total) {
        (Some(step), Some(total)) => Some(format!("step {step}/{total}")),
        (Some(step), None) => Some(format!("step {step}")),
        _ => None,
    }
}

/// ` (failed)` and `: <error>` as applicable.
fn completion_suffix(failed: bool, error: Option<&str>, fmt: &LabelFormatter) -> String {
    let mut suffix = String::new();
    if failed {
        suffix.push_str(" (failed)");
    }
    if let Some(error) = error {
        suffix.push_str(": ");
        suffix.push_str(&truncate(error, fmt.limits().max_value_chars));
    }
    suffix
}

fn name_list(names: &[String]) -> String {
    let mut list = names
        .iter()
        .take(MAX_INLINE_NAMES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > MAX_INLINE_NAMES {
        list.push_str(&format!(" +{} more", names.len() - MAX_INLINE_NAMES));
    }
    list
}

fn attempt(attempt: Option<u64>, max: Option<u64>) -> String {
    match (attempt, max) {
        (Some(n), Some(max)) => format!(" (attempt {n}/{max})"),
        (Some(n), None) => format!(" (attempt {n})"),
        _ => String::new(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

fn supervisor_start(d: &SupervisorStartDetails) -> String {
    non_blank(d.message.as_ref())
        .unwrap_or("Supervisor started")
        .to_string()
}

fn supervisor_dispatch(d: &SupervisorDispatchDetails, fmt: &LabelFormatter) -> String {
    let mut text = match (non_blank(d.message.as_ref()), non_blank(d.crew_name.as_ref())) {
        (Some(message), _) => message.to_string(),
        (None, Some(crew)) => format!("Dispatching to {crew}"),
        (None, None) => "Dispatching".to_string(),
    };
    if let Some(position) = position(d.step, d.total_steps) {
        text.push_str(&format!(" ({position})"));
    }
    match (d.parallel_count, d.parallel) {
        (Some(n), _) if n > 1 => text.push_str(&format!(" [parallel x{n}]")),
        (_, Some(true)) => text.push_str(" [parallel]"),
        _ => {}
    }
    text + &completion_suffix(false, non_blank(d.error.as_ref()), fmt)
}

fn supervisor_result(d: &SupervisorResultDetails, fmt: &LabelFormatter) -> String {
    let text = match (non_blank(d.message.as_ref()), non_blank(d.crew_name.as_ref())) {
        (Some(message), _) => message.to_string(),
        (None, Some(crew)) => format!("Result received from {crew}"),
        (None, None) => "Result received".to_string(),
    };
    text + &completion_suffix(false, non_blank(d.error.as_ref()), fmt)
}

fn supervisor_complete(d: &SupervisorCompleteDetails, fmt: &LabelFormatter) -> String {
    let text = non_blank(d.message.as_ref()).unwrap_or("Supervisor completed");
    text.to_string()
        + &completion_suffix(
            d.success == Some(false),
            non_blank(d.error.as_ref()),
            fmt,
        )
}

fn supervisor_error(d: &SupervisorErrorDetails, fmt: &LabelFormatter) -> String {
    let mut text = truncate(
        non_blank(d.error.as_ref()).unwrap_or("Unknown error"),
        fmt.limits().max_value_chars,
    );
    if let Some(context) = non_blank(d.context.as_ref()) {
        text.push_str("\nContext: ");
        text.push_str(&truncate(context, fmt.limits().max_value_chars));
    }
    text
}

fn crew_start(d: &CrewStartDetails) -> String {
    let crew = non_blank(d.crew_display_name.as_ref())
        .or_else(|| non_blank(d.crew_name.as_ref()))
        .unwrap_or("crew");
    let mut text = format!("Starting {crew}");
    if !d.agents.is_empty() {
        text.push_str(" with agents: ");
        text.push_str(&name_list(&d.agents));
    }
    text
}

fn agent_generating(d: &AgentGeneratingDetails) -> String {
    match (non_blank(d.message.as_ref()), non_blank(d.agent.as_ref())) {
        (Some(message), _) => message.to_string(),
        (None, Some(agent)) => format!("{agent} is generating a response"),
        (None, None) => "Generating response".to_string(),
    }
}

fn agent_thinking(d: &AgentThinkingDetails, fmt: &LabelFormatter) -> String {
    let agent = non_blank(d.agent.as_ref()).unwrap_or("Agent");
    match non_blank(d.delta.as_ref()) {
        Some(delta) => format!("{agent}: {}", truncate(delta, fmt.limits().max_value_chars)),
        None => format!("{agent} is thinking"),
    }
}

fn agent_complete(d: &AgentCompleteDetails, fmt: &LabelFormatter) -> String {
    let text = match (non_blank(d.message.as_ref()), non_blank(d.agent.as_ref())) {
        (Some(message), _) => message.to_string(),
        (None, Some(agent)) => format!("{agent} completed"),
        (None, None) => "Agent completed".to_string(),
    };
    text + &completion_suffix(d.success == Some(false), non_blank(d.error.as_ref()), fmt)
}

fn tool_start(d: &ToolStartDetails, fmt: &LabelFormatter) -> String {
    let tool = non_blank(d.tool_name.as_ref());
    let mut text = non_blank(d.friendly_name.as_ref())
        .or(tool)
        .unwrap_or("Tool")
        .to_string();

    if tool.is_some_and(|name| fmt.hides_arguments(name)) {
        return text;
    }
    if let Some(summary) = d
        .call_arguments
        .as_ref()
        .and_then(|args| format_call_arguments(args, fmt.limits()))
    {
        text.push('\n');
        text.push_str(&summary);
    }
    text
}

fn tool_complete(d: &ToolCompleteDetails, fmt: &LabelFormatter) -> String {
    let (text, named_failure) = match non_blank(d.friendly_name.as_ref()) {
        Some(friendly) => (
            friendly.to_string(),
            friendly.to_lowercase().contains("failed"),
        ),
        None => (
            format!(
                "{} completed",
                non_blank(d.tool_name.as_ref()).unwrap_or("Tool")
            ),
            false,
        ),
    };
    let failed = d.success == Some(false) && !named_failure;
    text + &completion_suffix(failed, non_blank(d.error.as_ref()), fmt)
}

fn tool_retry(d: &ToolRetryDetails, fmt: &LabelFormatter) -> String {
    let tool = non_blank(d.tool_name.as_ref()).unwrap_or("tool");
    let mut text = format!("Retrying {tool}{}", attempt(d.attempt, d.max_attempts));
    if let Some(reason) = non_blank(d.reason.as_ref()) {
        text.push_str("\nReason: ");
        text.push_str(&truncate(reason, fmt.limits().max_value_chars));
    }
    text
}

fn llm_call(d: &LlmCallDetails) -> String {
    let mut text = match (non_blank(d.message.as_ref()), non_blank(d.model.as_ref())) {
        (Some(message), _) => message.to_string(),
        (None, Some(model)) => format!("Calling {model}"),
        (None, None) => "LLM call".to_string(),
    };
    if let Some(agent) = non_blank(d.agent.as_ref()) {
        text.push_str(&format!(" for {agent}"));
    }
    text
}

fn formatter_processing(d: &FormatterProcessingDetails) -> String {
    non_blank(d.message.as_ref())
        .unwrap_or("Formatting results")
        .to_string()
}

fn specialist_retry(d: &SpecialistRetryDetails, fmt: &LabelFormatter) -> String {
    let specialist = non_blank(d.specialist.as_ref()).unwrap_or("specialist");
    let mut text = format!(
        "Retrying {specialist}{}",
        attempt(d.attempt, d.max_attempts)
    );
    if let Some(reason) = non_blank(d.reason.as_ref()) {
        text.push_str("\nReason: ");
        text.push_str(&truncate(reason, fmt.limits().max_value_chars));
    }
    text
}

fn specialist_error(d: &SpecialistErrorDetails, fmt: &LabelFormatter) -> String {
    let specialist = non_blank(d.specialist.as_ref()).unwrap_or("Specialist");
    format!("{specialist} failed")
        + &completion_suffix(false, non_blank(d.error.as_ref()), fmt)
}

fn domain_plan_created(d: &DomainPlanCreatedDetails) -> String {
    match non_blank(d.message.as_ref()) {
        Some(message) if d.domains.is_empty() => message.to_string(),
        Some(message) => format!("{message}\nDomains: {}", name_list(&d.domains)),
        None if d.domains.is_empty() => "Plan created".to_string(),
        None => format!("Plan created: {}", name_list(&d.domains)),
    }
}

fn domain_execution_start(d: &DomainExecutionStartDetails) -> String {
    let domain = non_blank(d.domain.as_ref()).unwrap_or("domain");
    let mut text = format!("Executing {domain}");
    if let Some(position) = position(d.position, d.total) {
        text.push_str(&format!(" ({position})"));
    }
    text
}

fn domain_completed(d: &DomainCompletedDetails, fmt: &LabelFormatter) -> String {
    let domain = non_blank(d.domain.as_ref()).unwrap_or("Domain");
    let mut text = format!("{domain} completed");
    if let (Some(ok), Some(total)) = (d.success_count, d.total_count) {
        text.push_str(&format!(" ({ok}/{total} succeeded)"));
    }
    text + &completion_suffix(d.success == Some(false), non_blank(d.error.as_ref()), fmt)
}

fn domain_skipped(d: &DomainSkippedDetails, fmt: &LabelFormatter) -> String {
    let domain = non_blank(d.domain.as_ref()).unwrap_or("Domain");
    match non_blank(d.reason.as_ref()) {
        Some(reason) => format!(
            "{domain} skipped: {}",
            truncate(reason, fmt.limits().max_value_chars)
        ),
        None => format!("{domain} skipped"),
    }
}

fn domain_category_error(d: &DomainCategoryErrorDetails, fmt: &LabelFormatter) -> String {
    let category = non_blank(d.category.as_ref()).unwrap_or("Category");
    format!("{category} failed") + &completion_suffix(false, non_blank(d.error.as_ref()), fmt)
}

fn file_ready(d: &FileReadyDetails) -> String {
    let name = non_blank(d.filename.as_ref()).unwrap_or("File");
    let mut text = format!("{name} ready");
    let meta: Vec<String> = non_blank(d.format.as_ref())
        .map(str::to_uppercase)
        .into_iter()
        .chain(d.size_bytes.map(human_size))
        .collect();
    if !meta.is_empty() {
        text.push_str(&format!(" ({})", meta.join(", ")));
    }
    text
}
