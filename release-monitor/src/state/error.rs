//! State persistence error types.

use thiserror::Error;

/// Errors that can occur while loading or saving release state.
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to read or write a state file.
    #[error("Failed to access state file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// State file contains invalid JSON.
    #[error("Failed to parse state file '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Atomically replacing the state file failed.
    #[error("Failed to replace state file '{path}': {source}")]
    PersistError {
        path: String,
        #[source]
        source: tempfile::PersistError,
    },

    /// The state key cannot be used as a file name.
    #[error("Invalid state key '{key}': only letters, digits, '.', '_' and '-' are allowed")]
    InvalidKey { key: String },
}
