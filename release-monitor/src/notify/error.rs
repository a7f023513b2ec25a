//! Notification error types.

use thiserror::Error;

/// Lead-in rendering error.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum SendError {
    /// HTTP error talking to Slack.
    #[error("Slack request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Slack rejected the message.
    #[error("Slack rejected message for channel '{channel}': {error}")]
    Rejected { channel: String, error: String },
}
