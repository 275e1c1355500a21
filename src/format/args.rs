//! Call-argument summaries for tool invocations.
//!
//! Sub-formatters are tried in priority order; the first that recognizes the
//! argument shape produces the summary.

use serde_json::{Map, Value};

use super::render::{render_entry, render_items, render_map, truncate, RenderLimits};

/// Curation database operations and their display labels.
const CURATION_METHODS: &[(&str, &str)] = &[
    ("lookup_gene", "Gene lookup"),
    ("search_genes", "Gene search"),
    ("lookup_allele", "Allele lookup"),
    ("search_alleles", "Allele search"),
    ("lookup_disease", "Disease lookup"),
    ("search_diseases", "Disease search"),
    ("lookup_ontology_term", "Ontology term lookup"),
    ("search_ontology", "Ontology search"),
];

const SYMBOL_KEYS: &[&str] = &["symbol", "gene_symbol", "allele_symbol"];
const ID_KEYS: &[&str] = &["id", "curie", "gene_id", "allele_id"];
const SPECIES_KEYS: &[&str] = &["species", "taxon", "taxon_id", "data_provider"];
const TERM_KEYS: &[&str] = &["term", "name"];
const PARAM_KEYS: &[&str] = &["params", "parameters", "query_params"];
const API_ADDRESS_KEYS: &[&str] = &["endpoint", "method", "base_url", "api"];

type SubFormatter = fn(&Map<String, Value>, &RenderLimits) -> Option<Vec<String>>;

/// Sub-formatters in priority order.
const SUB_FORMATTERS: &[SubFormatter] = &[
    curation_query,
    external_api,
    plain_query,
    section_path,
    url_request,
];

/// Summarize tool call arguments, or `None` when there is nothing to show.
#[must_use]
pub fn format_call_arguments(args: &Value, limits: &RenderLimits) -> Option<String> {
    match args {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(truncate(s, limits.max_value_chars)),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let mut lines = Vec::new();
            render_items(items, 0, limits, &mut lines);
            Some(limits.finish(&lines))
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => {
            let lines = SUB_FORMATTERS
                .iter()
                .find_map(|formatter| formatter(map, limits))
                .unwrap_or_else(|| {
                    let mut lines = Vec::new();
                    render_map(map, 0, limits, &mut lines);
                    lines
                });
            Some(limits.finish(&lines))
        }
        scalar => Some(limits.scalar(scalar)),
    }
}

/// First non-empty scalar under any of `keys`.
fn first_scalar<'a>(map: &'a Map<String, Value>, keys: &[&'a str]) -> Option<(&'a str, &'a Value)> {
    keys.iter().find_map(|key| match map.get(*key) {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value @ (Value::String(_) | Value::Number(_))) => Some((*key, value)),
        _ => None,
    })
}

fn text<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Nested parameter object, if the arguments carry one.
fn nested_params(map: &Map<String, Value>) -> Option<(&'static str, &Map<String, Value>)> {
    PARAM_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_object).map(|m| (*key, m)))
}

fn curation_label(method: &str) -> Option<&'static str> {
    let normalized = method.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    CURATION_METHODS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, label)| *label)
}

/// Lookups and searches against the curation database.
fn curation_query(map: &Map<String, Value>, limits: &RenderLimits) -> Option<Vec<String>> {
    let label = curation_label(text(map, "method")?)?;
    let params = nested_params(map).map_or(map, |(_, params)| params);

    let mut lines = vec![format!("Curation DB: {label}")];
    for (title, keys) in [
        ("Symbol", SYMBOL_KEYS),
        ("ID", ID_KEYS),
        ("Species", SPECIES_KEYS),
        ("Term", TERM_KEYS),
    ] {
        if let Some((_, value)) = first_scalar(params, keys) {
            lines.push(format!("{title}: {}", limits.scalar(value)));
        }
    }
    Some(lines)
}

/// REST calls addressed by endpoint.
fn external_api(map: &Map<String, Value>, limits: &RenderLimits) -> Option<Vec<String>> {
    let endpoint = text(map, "endpoint")?;
    let method = text(map, "method").unwrap_or("GET").to_ascii_uppercase();
    let base = text(map, "base_url")
        .or_else(|| text(map, "api"))
        .unwrap_or_default();

    let mut lines = vec![format!("{method} {base}{endpoint}")];

    let (params, skip) = match nested_params(map) {
        Some((_, params)) => (params, &[][..]),
        None => (map, API_ADDRESS_KEYS),
    };

    let symbol = first_scalar(params, SYMBOL_KEYS);
    let species = first_scalar(params, SPECIES_KEYS);
    if let Some((_, value)) = symbol {
        lines.push(format!("Symbol: {}", limits.scalar(value)));
    }
    if let Some((_, value)) = species {
        lines.push(format!("Species: {}", limits.scalar(value)));
    }

    let shown: Vec<&str> = [symbol, species].into_iter().flatten().map(|(k, _)| k).collect();
    for (key, value) in params {
        if skip.contains(&key.as_str()) || shown.contains(&key.as_str()) {
            continue;
        }
        render_entry(key, value, 0, limits, &mut lines);
    }
    Some(lines)
}

/// Free-text or SQL queries, shown verbatim.
fn plain_query(map: &Map<String, Value>, _limits: &RenderLimits) -> Option<Vec<String>> {
    if let Some(query) = text(map, "query") {
        return Some(vec![format!("Query: {query}")]);
    }
    text(map, "sql").map(|sql| vec![format!("SQL: {sql}")])
}

/// Document section paths.
fn section_path(map: &Map<String, Value>, limits: &RenderLimits) -> Option<Vec<String>> {
    let section = text(map, "section").or_else(|| text(map, "section_name"));
    let subsection = text(map, "subsection").or_else(|| text(map, "subsection_name"));
    if section.is_none() && subsection.is_none() {
        return None;
    }

    let mut lines = Vec::new();
    if let Some(section) = section {
        lines.push(format!("Section: {}", truncate(section, limits.max_value_chars)));
    }
    if let Some(subsection) = subsection {
        lines.push(format!("Subsection: {}", truncate(subsection, limits.max_value_chars)));
    }
    Some(lines)
}

/// Requests addressed by full URL, with optional body or params.
fn url_request(map: &Map<String, Value>, limits: &RenderLimits) -> Option<Vec<String>> {
    let url = text(map, "url")?;
    let method = text(map, "method").unwrap_or("GET").to_ascii_uppercase();

    let mut lines = vec![format!("{method} {}", truncate(url, limits.max_value_chars))];
    for (title, key) in [("Body", "body"), ("Params", "params")] {
        match map.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(inner)) => {
                lines.push(format!("{title}:"));
                render_map(inner, 1, limits, &mut lines);
            }
            Some(Value::Array(items)) => {
                lines.push(format!("{title}:"));
                render_items(items, 1, limits, &mut lines);
            }
            Some(scalar) => lines.push(format!("{title}: {}", limits.scalar(scalar))),
        }
    }
    Some(lines)
}
