//! Generic rendering of schema-less parameter values.

use serde_json::{Map, Value};

use crate::config::FormatConfig;

/// Marker appended to truncated text.
pub const TRUNCATION_MARKER: &str = "...";

/// Replacement for redacted values.
pub const REDACTED: &str = "[redacted]";

/// Truncate a string to at most `max_chars` characters, ending in `...` when
/// anything was cut.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let marker_len = TRUNCATION_MARKER.len();
    if max_chars <= marker_len {
        return TRUNCATION_MARKER.to_string();
    }
    let mut out: String = s.chars().take(max_chars - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Length budgets and redaction policy for rendered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLimits {
    pub max_value_chars: usize,
    pub max_block_chars: usize,
    pub max_array_items: usize,
    redacted_keys: Vec<String>,
}

impl RenderLimits {
    /// Limits taken from the formatter configuration.
    #[must_use]
    pub fn from_config(config: &FormatConfig) -> Self {
        Self {
            max_value_chars: config.max_value_chars,
            max_block_chars: config.max_block_chars,
            max_array_items: config.max_array_items,
            redacted_keys: config
                .redacted_keys
                .iter()
                .map(|k| k.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether values under `key` must not be shown.
    #[must_use]
    pub fn is_redacted(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.redacted_keys.iter().any(|k| *k == key)
    }

    /// Render one scalar value, capped to the value budget.
    #[must_use]
    pub fn scalar(&self, value: &Value) -> String {
        match value {
            Value::String(s) => truncate(s, self.max_value_chars),
            other => truncate(&other.to_string(), self.max_value_chars),
        }
    }

    /// Join rendered lines and cap the block budget.
    #[must_use]
    pub fn finish(&self, lines: &[String]) -> String {
        truncate(&lines.join("\n"), self.max_block_chars)
    }
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self::from_config(&FormatConfig::default())
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Render every entry of `map` as `key: value` lines at `depth`.
///
/// Keys render in map order, which is sorted for `serde_json` maps.
pub fn render_map(map: &Map<String, Value>, depth: usize, limits: &RenderLimits, out: &mut Vec<String>) {
    for (key, value) in map {
        render_entry(key, value, depth, limits, out);
    }
}

/// Render one `key: value` entry, recursing into objects and arrays.
pub fn render_entry(key: &str, value: &Value, depth: usize, limits: &RenderLimits, out: &mut Vec<String>) {
    let pad = indent(depth);
    if limits.is_redacted(key) {
        out.push(format!("{pad}{key}: {REDACTED}"));
        return;
    }
    match value {
        Value::Object(map) if map.is_empty() => out.push(format!("{pad}{key}: {{}}")),
        Value::Object(map) => {
            out.push(format!("{pad}{key}:"));
            render_map(map, depth + 1, limits, out);
        }
        Value::Array(items) if items.is_empty() => out.push(format!("{pad}{key}: []")),
        Value::Array(items) => {
            out.push(format!("{pad}{key}:"));
            render_items(items, depth + 1, limits, out);
        }
        scalar => out.push(format!("{pad}{key}: {}", limits.scalar(scalar))),
    }
}

/// Render array entries as `- item` bullets, capped at the array budget.
///
/// Nested objects and arrays open a bare `-` bullet and render their contents
/// one level deeper, so redaction applies inside them too.
pub fn render_items(items: &[Value], depth: usize, limits: &RenderLimits, out: &mut Vec<String>) {
    let pad = indent(depth);
    for item in items.iter().take(limits.max_array_items) {
        match item {
            Value::Object(map) if map.is_empty() => out.push(format!("{pad}- {{}}")),
            Value::Object(map) => {
                out.push(format!("{pad}-"));
                render_map(map, depth + 1, limits, out);
            }
            Value::Array(nested) if nested.is_empty() => out.push(format!("{pad}- []")),
            Value::Array(nested) => {
                out.push(format!("{pad}-"));
                render_items(nested, depth + 1, limits, out);
            }
            scalar => out.push(format!("{pad}- {}", limits.scalar(scalar))),
        }
    }
    if items.len() > limits.max_array_items {
        out.push(format!("{pad}+{} more", items.len() - limits.max_array_items));
    }
}

/// Render any value as a standalone block.
#[must_use]
pub fn render_value(value: &Value, limits: &RenderLimits) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) => render_map(map, 0, limits, &mut lines),
        Value::Array(items) => render_items(items, 0, limits, &mut lines),
        scalar => lines.push(limits.scalar(scalar)),
    }
    limits.finish(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "...");
        assert_eq!(truncate("hello", 0), "...");
    }

    #[test]
    fn test_truncate_multibyte_is_char_safe() {
        let s = "é".repeat(10);
        assert_eq!(truncate(&s, 5), "éé...");
    }

    #[test]
    fn test_nested_objects_indent() {
        let value = json!({"filter": {"species": {"taxon": "NCBITaxon:6239"}}, "limit": 10});
        let rendered = render_value(&value, &RenderLimits::default());
        assert_eq!(
            rendered,
            "filter:\n  species:\n    taxon: NCBITaxon:6239\nlimit: 10"
        );
    }

    #[test]
    fn test_array_capped_at_five() {
        let value = json!({"genes": ["a", "b", "c", "d", "e", "f", "g", "h"]});
        let rendered = render_value(&value, &RenderLimits::default());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "genes:");
        assert_eq!(lines.iter().filter(|l| l.trim_start().starts_with("- ")).count(), 5);
        assert_eq!(lines.last().copied(), Some("  +3 more"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_long_value_truncated() {
        let value = json!({"text": "x".repeat(10_000)});
        let rendered = render_value(&value, &RenderLimits::default());
        assert_eq!(rendered.chars().count(), "text: ".len() + 200);
        assert!(rendered.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_block_budget() {
        let map: serde_json::Map<String, Value> = (0..100)
            .map(|i| (format!("key{i:03}"), json!("y".repeat(150))))
            .collect();
        let rendered = render_value(&Value::Object(map), &RenderLimits::default());
        assert_eq!(rendered.chars().count(), 1500);
        assert!(rendered.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_redacted_keys() {
        let value = json!({"API_KEY": "sk-123", "params": {"token": "abc", "symbol": "daf-16"}});
        let rendered = render_value(&value, &RenderLimits::default());
        assert!(!rendered.contains("sk-123"));
        assert!(!rendered.contains("abc"));
        assert!(rendered.contains("API_KEY: [redacted]"));
        assert!(rendered.contains("symbol: daf-16"));
    }

    #[test]
    fn test_redaction_reaches_into_arrays() {
        let value = json!({
            "credentials": [{"token": "sk-SECRET"}],
            "body": {"items": [{"password": "hunter2", "name": "x"}, [{"secret": "s3"}]]}
        });
        let rendered = render_value(&value, &RenderLimits::default());
        assert!(!rendered.contains("sk-SECRET"), "got: {rendered}");
        assert!(!rendered.contains("hunter2"), "got: {rendered}");
        assert!(!rendered.contains("s3"), "got: {rendered}");
        assert_eq!(
            rendered,
            "body:\n  items:\n    -\n      name: x\n      password: [redacted]\n    -\n      -\n        secret: [redacted]\ncredentials:\n  -\n    token: [redacted]"
        );
    }

    #[test]
    fn test_empty_containers_and_scalars() {
        let value = json!({"a": [], "b": {}, "c": null, "d": true});
        let rendered = render_value(&value, &RenderLimits::default());
        assert_eq!(rendered, "a: []\nb: {}\nc: null\nd: true");
    }

    #[test]
    fn test_render_is_deterministic() {
        let value = json!({"z": 1, "a": [1, 2, {"k": "v"}], "m": {"x": "y"}});
        let limits = RenderLimits::default();
        assert_eq!(render_value(&value, &limits), render_value(&value, &limits));
    }
}
