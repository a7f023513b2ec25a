//! Chat delivery.

use crate::notify::{Notification, SendError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default Slack Web API base URL.
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Request timeout for Slack calls.
const SEND_TIMEOUT_SECS: u64 = 30;

/// Delivers notifications to chat.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Sends a notification to every channel it targets.
    async fn send(&self, notification: &Notification) -> Result<(), SendError>;
}

/// Subset of the Slack Web API response envelope.
#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// [`ChatSink`] posting through the Slack Web API with a bot token.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    /// Creates a client for the public Slack API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: String) -> Result<Self, reqwest::Error> {
        Self::with_api_url(token, SLACK_API_URL)
    }

    /// Creates a client for a custom Slack API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_url(token: String, api_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("release-monitor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatSink for SlackClient {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let url = format!("{}/chat.postMessage", self.api_url);

        for channel in &notification.channels {
            let response: SlackResponse = self
                .client
                .post(&url)
                .bearer_auth(&self.token)
                .json(&notification.slack_payload(channel))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if !response.ok {
                return Err(SendError::Rejected {
                    channel: channel.clone(),
                    error: response.error.unwrap_or_else(|| "unknown error".to_string()),
                });
            }
            debug!(channel = %channel, "Posted release notification");
        }

        Ok(())
    }
}

/// [`ChatSink`] that prints notifications instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink;

#[async_trait]
impl ChatSink for DryRunSink {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        info!(channels = ?notification.channels, "Dry run, not sending notification");

        println!("\n[DRY RUN] Would notify {}", notification.channels.join(", "));
        println!("  {}", notification.text);
        println!("  Title: {}", notification.title);
        println!("  Color: {}", notification.color);
        for line in notification.body.lines().take(10) {
            println!("    {line}");
        }
        if notification.body.lines().count() > 10 {
            println!("    ...");
        }

        Ok(())
    }
}
