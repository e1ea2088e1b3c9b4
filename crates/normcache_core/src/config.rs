//! Importer configuration.
//!
//! # Responsibility
//! - Hold the knobs that change normalization or collection behavior.
//! - Load them from JSON with every field optional.
//!
//! # Invariants
//! - `log_level` is always one of `trace|debug|info|warn|error` after loading.
//! - Both dedup strategies produce identical emissions.

use crate::logging::{default_log_level, init_logging, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// How the unique collector finds repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Equality scan per insertion. Fine for page-sized batches.
    Linear,
    /// Id to position index.
    #[default]
    Hashed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub dedup_strategy: DedupStrategy,
    /// Show content-warned posts expanded on first sight.
    pub expand_spoilers: bool,
    pub log_level: String,
    /// Absolute directory for rolling logs. Logging stays off when unset.
    pub log_dir: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dedup_strategy: DedupStrategy::default(),
            expand_spoilers: false,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidLogLevel(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl ImportConfig {
    /// Parses a JSON config document. Missing keys take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(text)?;
        config.log_level = normalize_level(&config.log_level)
            .map_err(ConfigError::InvalidLogLevel)?
            .to_string();
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Starts file logging when `log_dir` is configured; no-op otherwise.
    pub fn init_logging(&self) -> Result<(), String> {
        match self.log_dir.as_deref() {
            Some(dir) => init_logging(&self.log_level, dir),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DedupStrategy, ImportConfig};

    #[test]
    fn empty_document_uses_defaults() {
        let config = ImportConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ImportConfig::default());
        assert_eq!(config.dedup_strategy, DedupStrategy::Hashed);
    }

    #[test]
    fn parses_strategy_and_normalizes_level() {
        let config = ImportConfig::from_json_str(
            r#"{"dedup_strategy": "linear", "expand_spoilers": true, "log_level": " WARNING "}"#,
        )
        .unwrap();
        assert_eq!(config.dedup_strategy, DedupStrategy::Linear);
        assert!(config.expand_spoilers);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = ImportConfig::from_json_str(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn init_logging_without_dir_is_a_no_op() {
        assert_eq!(ImportConfig::default().init_logging(), Ok(()));
    }
}
