//! Configuration loading and typed config structures for the Scholar engine.
//!
//! The canonical configuration lives in `scholar-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.

use std::path::{Path, PathBuf};

use scholar_types::PaperId;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `scholar-config.yaml`. Every field has a
/// default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScholarConfig {
    /// Where the research content lives.
    #[serde(default)]
    pub content: ContentConfig,

    /// Progression behavior.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Event-log replay settings for the command-line runner.
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl ScholarConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for content paths:
    /// - `SCHOLAR_PAPERS_PATH` overrides `content.papers_path`
    /// - `SCHOLAR_SETS_PATH` overrides `content.sets_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.content.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.content.apply_env_overrides();
        Ok(config)
    }
}

/// Content file locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// JSON array of papers.
    #[serde(default = "default_papers_path")]
    pub papers_path: PathBuf,

    /// JSON array of research sets.
    #[serde(default = "default_sets_path")]
    pub sets_path: PathBuf,
}

impl ContentConfig {
    /// Override content paths with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SCHOLAR_PAPERS_PATH") {
            self.papers_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SCHOLAR_SETS_PATH") {
            self.sets_path = PathBuf::from(val);
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            papers_path: default_papers_path(),
            sets_path: default_sets_path(),
        }
    }
}

/// Progression behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Refuse trusted completions of papers that are not currently
    /// available. Forced completions always apply.
    #[serde(default)]
    pub strict_availability: bool,

    /// Papers every new context starts with, applied in order.
    #[serde(default)]
    pub starting_papers: Vec<PaperId>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Event-log replay settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReplayConfig {
    /// JSON array of completion events to replay at startup.
    #[serde(default)]
    pub events_path: Option<PathBuf>,

    /// Directory to write one snapshot per context after replay.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

fn default_papers_path() -> PathBuf {
    PathBuf::from("content/papers.json")
}

fn default_sets_path() -> PathBuf {
    PathBuf::from("content/research-sets.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScholarConfig::default();
        assert_eq!(config.content.papers_path, PathBuf::from("content/papers.json"));
        assert!(!config.engine.strict_availability);
        assert!(config.engine.starting_papers.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.replay.events_path.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
content:
  papers_path: "data/papers.json"
  sets_path: "data/sets.json"

engine:
  strict_availability: true
  starting_papers:
    - ore_survey
    - quarrying

logging:
  level: "debug"
  json: true

replay:
  events_path: "saves/events.json"
  snapshot_dir: "saves/snapshots"
"#;
        let config = ScholarConfig::parse(yaml);
        assert!(config.is_ok(), "Failed to parse: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert!(config.engine.strict_availability);
        assert_eq!(
            config.engine.starting_papers,
            vec![PaperId::from("ore_survey"), PaperId::from("quarrying")]
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(
            config.replay.snapshot_dir,
            Some(PathBuf::from("saves/snapshots"))
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "engine:\n  strict_availability: true\n";
        let config = ScholarConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert!(config.engine.strict_availability);
        // Everything else uses defaults
        assert_eq!(config.logging.level, "info");
        assert!(config.engine.starting_papers.is_empty());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = ScholarConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let config = ScholarConfig::parse("engine: [not, a, map]");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("scholar-config.yaml");
        if path.exists() {
            let config = ScholarConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
