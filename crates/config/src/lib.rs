//! Configuration loading, validation, and management for Topicwise.
//!
//! Loads configuration from `~/.topicwise/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// History backends understood by [`HistoryConfig::backend`].
pub const HISTORY_BACKENDS: &[&str] = &["sqlite", "file", "memory", "none"];

/// The root configuration structure.
///
/// Maps directly to `~/.topicwise/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Document sampling
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Generation history storage and lookback
    #[serde(default)]
    pub history: HistoryConfig,

    /// How many items a batch should contain
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Coverage projection
    #[serde(default)]
    pub coverage: CoverageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Character budget handed to the topic extractor (~30k tokens)
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    120_000
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_backend")]
    pub backend: String,

    /// Storage location; defaults to a file under the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Number of most recent sessions that count as history
    #[serde(default = "default_lookback_sessions")]
    pub lookback_sessions: usize,

    /// Records fetched per lookback session. Bounds the read, nothing more.
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: usize,

    /// Label counted for records that carry no topic
    #[serde(default = "default_fallback_topic")]
    pub fallback_topic: String,
}

fn default_history_backend() -> String {
    "sqlite".into()
}
fn default_lookback_sessions() -> usize {
    3
}
fn default_fetch_multiplier() -> usize {
    50
}
fn default_fallback_topic() -> String {
    "General".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: default_history_backend(),
            path: None,
            lookback_sessions: default_lookback_sessions(),
            fetch_multiplier: default_fetch_multiplier(),
            fallback_topic: default_fallback_topic(),
        }
    }
}

impl HistoryConfig {
    /// Where the configured backend keeps its data.
    ///
    /// A leading `~/` expands to the home directory. Without an explicit
    /// path, `sqlite` uses `~/.topicwise/history.sqlite` and `file` uses
    /// `~/.topicwise/history.jsonl`.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(p) => expand_home(p),
            None => {
                let file = if self.backend == "file" {
                    "history.jsonl"
                } else {
                    "history.sqlite"
                };
                EngineConfig::config_dir().join(file)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Smallest batch the adaptive policy will ask for
    #[serde(default = "default_min_items")]
    pub min_items: usize,

    /// Largest batch the adaptive policy will ask for
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_min_items() -> usize {
    20
}
fn default_max_items() -> usize {
    40
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_items: default_min_items(),
            max_items: default_max_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Assumed number of new topics one session addresses
    #[serde(default = "default_topics_per_session")]
    pub topics_per_session: usize,
}

fn default_topics_per_session() -> usize {
    20
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            topics_per_session: default_topics_per_session(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default path (~/.topicwise/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `TOPICWISE_HISTORY_BACKEND`
    /// - `TOPICWISE_HISTORY_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("TOPICWISE_HISTORY_BACKEND") {
            self.history.backend = backend;
        }
        if let Some(path) = lookup("TOPICWISE_HISTORY_PATH") {
            self.history.path = Some(path);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".topicwise")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampler.max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "sampler.max_chars must be > 0".into(),
            ));
        }

        if !HISTORY_BACKENDS.contains(&self.history.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "history.backend must be one of {}, got \"{}\"",
                HISTORY_BACKENDS.join(", "),
                self.history.backend
            )));
        }

        if self.history.lookback_sessions == 0 || self.history.fetch_multiplier == 0 {
            return Err(ConfigError::ValidationError(
                "history.lookback_sessions and history.fetch_multiplier must be > 0".into(),
            ));
        }

        if self.allocation.min_items > self.allocation.max_items {
            return Err(ConfigError::ValidationError(
                "allocation.min_items must not exceed allocation.max_items".into(),
            ));
        }

        if self.coverage.topics_per_session == 0 {
            return Err(ConfigError::ValidationError(
                "coverage.topics_per_session must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs_home().join(rest),
        None => PathBuf::from(path),
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sampler.max_chars, 120_000);
        assert_eq!(config.history.lookback_sessions, 3);
        assert_eq!(config.history.fetch_multiplier, 50);
        assert_eq!(config.allocation.min_items, 20);
        assert_eq!(config.allocation.max_items, 40);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.history.backend, config.history.backend);
        assert_eq!(parsed.sampler.max_chars, config.sampler.max_chars);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[history]\nbackend = \"file\"\nlookback_sessions = 5").unwrap();

        let config = EngineConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.history.backend, "file");
        assert_eq!(config.history.lookback_sessions, 5);
        assert_eq!(config.history.fetch_multiplier, 50);
        assert_eq!(config.coverage.topics_per_session, 20);
    }

    #[test]
    fn unknown_backend_rejected() {
        let mut config = EngineConfig::default();
        config.history.backend = "redis".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn inverted_item_bounds_rejected() {
        let mut config = EngineConfig::default();
        config.allocation.min_items = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_budget_rejected() {
        let mut config = EngineConfig::default();
        config.sampler.max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[sampler\nmax_chars = ").unwrap();
        let err = EngineConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = EngineConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().history.backend, "sqlite");
    }

    #[test]
    fn overrides_replace_history_settings() {
        let mut config = EngineConfig::default();
        config.apply_overrides(|key| match key {
            "TOPICWISE_HISTORY_BACKEND" => Some("file".into()),
            "TOPICWISE_HISTORY_PATH" => Some("/var/lib/topicwise/h.jsonl".into()),
            _ => None,
        });
        assert_eq!(config.history.backend, "file");
        assert_eq!(
            config.history.resolved_path(),
            PathBuf::from("/var/lib/topicwise/h.jsonl")
        );
    }

    #[test]
    fn default_path_follows_backend() {
        let mut history = HistoryConfig::default();
        assert!(history.resolved_path().ends_with("history.sqlite"));
        history.backend = "file".into();
        assert!(history.resolved_path().ends_with("history.jsonl"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = EngineConfig::default_toml();
        assert!(toml_str.contains("max_chars = 120000"));
        assert!(toml_str.contains("sqlite"));
    }
}
