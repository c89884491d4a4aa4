//! Error types for the `scholar` binary.
//!
//! [`CliError`] wraps every failure mode of startup and replay so `main`
//! can propagate with `?`.

use std::path::Path;

/// Top-level error for the `scholar` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: scholar_engine::ConfigError,
    },

    /// Research content failed to load or validate.
    #[error("content error: {source}")]
    Content {
        /// The underlying catalog error.
        #[from]
        source: scholar_catalog::CatalogError,
    },

    /// The engine rejected its configuration or a snapshot.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: scholar_engine::EngineError,
    },

    /// The completion-event log is not a JSON array of events.
    #[error("failed to parse event log {path}: {source}")]
    Events {
        /// The event log path.
        path: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A file or stream operation failed.
    #[error("I/O error on {target}: {source}")]
    Io {
        /// The file, directory or stream involved.
        target: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Logging could not be initialized.
    #[error("logging setup failed: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}

impl CliError {
    /// A [`CliError::Io`] naming `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            target: path.display().to_string(),
            source,
        }
    }
}
