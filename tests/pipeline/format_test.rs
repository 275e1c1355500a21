//! Labels for parsed records.

use curation_audit::config::FormatConfig;
use curation_audit::events::EventParser;
use curation_audit::format::LabelFormatter;
use serde_json::{json, Value};

use super::item;

fn label(kind: &str, payload: Value) -> String {
    label_with(&LabelFormatter::default(), kind, payload)
}

fn label_with(formatter: &LabelFormatter, kind: &str, payload: Value) -> String {
    let record = EventParser::new()
        .parse(&item(kind, "s1", payload), "s1")
        .expect("accepted");
    formatter.label(&record).to_string()
}

#[test]
fn test_supervisor_start_label() {
    assert_eq!(label("SUPERVISOR_START", json!({"message": "go"})), "[SUPERVISOR] go");
}

#[test]
fn test_specialist_tool_uses_agent_prefix() {
    let text = label(
        "TOOL_START",
        json!({"toolName": "ask_pdf_specialist", "friendlyName": "Asking PDF specialist"}),
    );
    assert!(text.starts_with("[AGENT] Asking PDF specialist"), "got: {text}");
}

#[test]
fn test_failed_tool_without_friendly_name() {
    let text = label("TOOL_COMPLETE", json!({"toolName": "search_genes", "success": false}));
    assert!(text.ends_with("(failed)"), "got: {text}");
}

#[test]
fn test_curation_lookup_arguments() {
    let text = label(
        "TOOL_START",
        json!({
            "toolName": "curation_db",
            "friendlyName": "Querying curation database",
            "toolArgs": {"method": "lookup_gene", "symbol": "daf-16", "taxon": "NCBITaxon:6239"}
        }),
    );
    assert_eq!(
        text,
        "[TOOL] Querying curation database\nCuration DB: Gene lookup\nSymbol: daf-16\nSpecies: NCBITaxon:6239"
    );
}

#[test]
fn test_query_arguments() {
    let text = label(
        "TOOL_START",
        json!({"toolName": "sql_query", "toolArgs": {"query": "SELECT 1"}}),
    );
    assert_eq!(text, "[TOOL] sql_query\nQuery: SELECT 1");
}

#[test]
fn test_formatter_tool_hides_arguments() {
    let text = label(
        "TOOL_START",
        json!({"toolName": "format_csv", "toolArgs": {"rows": [1, 2, 3]}}),
    );
    assert_eq!(text, "[TOOL] format_csv");
}

#[test]
fn test_array_truncated_to_five_items() {
    let text = label(
        "TOOL_START",
        json!({"toolName": "batch", "toolArgs": {"ids": [1, 2, 3, 4, 5, 6, 7, 8]}}),
    );
    let bullets = text.lines().filter(|l| l.trim_start().starts_with("- ")).count();
    assert_eq!(bullets, 5);
    assert!(text.lines().any(|l| l.trim() == "+3 more"), "got: {text}");
}

#[test]
fn test_long_value_is_capped() {
    let long = "x".repeat(10_000);
    let text = label(
        "TOOL_START",
        json!({"toolName": "upload", "toolArgs": {"content": long}}),
    );
    assert!(text.len() < 1_000);
    assert!(text.ends_with("..."));
}

#[test]
fn test_secrets_are_redacted() {
    let text = label(
        "TOOL_START",
        json!({"toolName": "fetch", "toolArgs": {"url": "https://example.org", "params": {"api_key": "hunter2", "q": "x"}}}),
    );
    assert!(!text.contains("hunter2"));
    assert!(text.contains("api_key: [redacted]"), "got: {text}");
}

#[test]
fn test_configured_budgets_apply() {
    let config = FormatConfig {
        max_array_items: 2,
        ..FormatConfig::default()
    };
    let formatter = LabelFormatter::new(&config);
    let text = label_with(
        &formatter,
        "TOOL_START",
        json!({"toolName": "batch", "toolArgs": {"ids": [1, 2, 3]}}),
    );
    assert!(text.lines().any(|l| l.trim() == "+1 more"), "got: {text}");
}

#[test]
fn test_dispatch_parallel_annotation() {
    let text = label(
        "SUPERVISOR_DISPATCH",
        json!({"crewName": "gene_crew", "step": 2, "totalSteps": 4, "parallelCount": 3}),
    );
    assert_eq!(
        text,
        "[SUPERVISOR] Dispatching to gene_crew (step 2/4) [parallel x3]"
    );
}

#[test]
fn test_payload_with_both_spellings_keeps_its_fields() {
    assert_eq!(
        label(
            "SUPERVISOR_ERROR",
            json!({"error": "db down", "message": "Supervisor failed"})
        ),
        "[SUPERVISOR] db down"
    );
    assert_eq!(
        label(
            "SUPERVISOR_DISPATCH",
            json!({"crewName": "gene", "agent": "gene_agent", "step": 2, "totalSteps": 3})
        ),
        "[SUPERVISOR] Dispatching to gene (step 2/3)"
    );
}
