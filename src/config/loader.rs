//! Configuration file loader.

use std::path::PathBuf;

use regex::Regex;

use super::types::AuditConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .curation-audit.toml
        search_paths.push(PathBuf::from(".curation-audit.toml"));

        // 2. User config directory: ~/.config/curation-audit/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("curation-audit").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// it names an invalid agent tool pattern.
    pub fn load(&self) -> Result<AuditConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                let config = Self::load_from_path(path)?;
                validate(&config)?;
                return Ok(config);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(AuditConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<AuditConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &AuditConfig) -> Result<(), ConfigError> {
    for pattern in &config.format.agent_tool_patterns {
        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid agent tool pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert!(loader.search_paths()[0].ends_with(".curation-audit.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let config = loader.load().unwrap();
        assert!(config.storage.path.is_none());
        assert_eq!(config.format.max_array_items, 5);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [storage]
            path = "/tmp/audit-logs.db"

            [format]
            max_value_chars = 80
            agent_tool_patterns = ["^transfer_to_"]
            "#
        )
        .unwrap();

        let config = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/audit-logs.db")));
        assert_eq!(config.format.max_value_chars, 80);
        assert_eq!(config.format.agent_tool_patterns, vec!["^transfer_to_"]);
        assert_eq!(config.format.max_block_chars, 1500);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[format\nmax_value_chars = ").unwrap();

        let err = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_rejects_bad_pattern() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[format]\nagent_tool_patterns = [\"(unclosed\"]\n").unwrap();

        let err = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }
}
