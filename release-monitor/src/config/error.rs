//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the configuration.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// A repository entry is not in `owner/repo` form.
    #[error("Invalid repository '{value}': {reason}")]
    InvalidRepository { value: String, reason: String },
}
