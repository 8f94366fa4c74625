//! Core error types for phasecast-core.
//!
//! Phase resolution itself never fails. Errors only come from the layers
//! around it: reading milestone records and loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for phasecast-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Milestone source errors
    #[error("Milestone source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while fetching the active event's milestone record.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The milestone file could not be read
    #[error("Failed to read milestones from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The milestone file is not a valid record
    #[error("Failed to parse milestones in {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// File extension is neither JSON nor TOML
    #[error("Unsupported milestone file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No home directory to place the config under
    #[error("Could not determine a data directory")]
    NoDataDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch() -> Result<()> {
        Err(SourceError::UnsupportedFormat(PathBuf::from("m.yaml")))?
    }

    #[test]
    fn layer_errors_convert_into_core_error() {
        let err = fetch().unwrap_err();
        assert!(matches!(err, CoreError::Source(SourceError::UnsupportedFormat(_))));
        assert!(err.to_string().contains("m.yaml"));

        let err: CoreError = ConfigError::UnknownKey("links.x".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown config key: links.x"
        );
    }
}
