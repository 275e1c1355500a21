//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Durable log storage.
    pub storage: StorageConfig,
    /// Label formatting budgets and policies.
    pub format: FormatConfig,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the `SQLite` database. Defaults to [`default_storage_path`].
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, or the default location.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_storage_path)
    }
}

/// Returns the default path for the session log database.
///
/// This is `~/.local/share/curation-audit/logs.db` on Unix systems.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("curation-audit")
        .join("logs.db")
}

/// Label formatter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Maximum characters of a single rendered value.
    pub max_value_chars: usize,
    /// Maximum characters of a rendered argument block.
    pub max_block_chars: usize,
    /// Maximum array entries rendered before `+N more`.
    pub max_array_items: usize,
    /// Tool names matching any of these patterns are shown as agents.
    pub agent_tool_patterns: Vec<String>,
    /// Tools whose call arguments are bulk data and never shown.
    pub hidden_argument_tools: Vec<String>,
    /// Argument keys whose values are replaced by `[redacted]`.
    pub redacted_keys: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_value_chars: 200,
            max_block_chars: 1500,
            max_array_items: 5,
            agent_tool_patterns: vec!["^ask_[a-z0-9_]+_specialist$".to_string()],
            hidden_argument_tools: ["format_csv", "format_tsv", "format_json", "export_results"]
                .into_iter()
                .map(String::from)
                .collect(),
            redacted_keys: [
                "api_key",
                "apikey",
                "token",
                "access_token",
                "password",
                "secret",
                "authorization",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
