//! Runner error types.

use crate::config::ConfigError;
use crate::enrich::EnrichmentError;
use crate::github::FetchError;
use crate::notify::{SendError, TemplateError};
use crate::state::StateError;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    GitHub(#[from] FetchError),

    /// HTTP client initialization errors.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// Loading or saving release state failed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors that fail a single repository without aborting the run.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Fetching the release list failed.
    #[error("Failed to fetch releases: {0}")]
    Fetch(#[from] FetchError),

    /// Avatar or accent color lookup failed.
    #[error("Failed to enrich release: {0}")]
    Enrich(#[from] EnrichmentError),

    /// Rendering the notification failed.
    #[error("Failed to compose notification: {0}")]
    Compose(#[from] TemplateError),

    /// Delivering the notification failed.
    #[error("Failed to send notification: {0}")]
    Send(#[from] SendError),
}
