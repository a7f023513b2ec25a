//! Repository data error types.

use thiserror::Error;

/// Errors that can occur while fetching releases or profiles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The requested resource does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The request could not be completed.
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
}
