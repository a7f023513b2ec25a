//! Release notification payload.

use crate::enrich::AccentColor;
use serde::Serialize;
use serde_json::{json, Value};

/// A composed release notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Lead-in line shown above the attachment.
    pub text: String,

    /// Release name.
    pub title: String,

    /// Release notes in Slack mrkdwn.
    pub body: String,

    /// Release page URL.
    pub author_link: String,

    /// Owner avatar URL.
    pub author_icon: String,

    /// Attachment color.
    pub color: AccentColor,

    /// Footer text, a Slack link to the release labelled with the slug.
    pub footer: String,

    /// Footer icon URL.
    pub footer_icon: String,

    /// Release creation time in Unix seconds.
    pub ts: i64,

    /// Channels the notification is sent to.
    pub channels: Vec<String>,
}

impl Notification {
    /// Builds the `chat.postMessage` payload for one channel.
    #[must_use]
    pub fn slack_payload(&self, channel: &str) -> Value {
        json!({
            "channel": channel,
            "text": self.text,
            "unfurl_links": false,
            "attachments": [{
                "author_name": self.title,
                "author_link": self.author_link,
                "author_icon": self.author_icon,
                "text": self.body,
                "fallback": self.body,
                "color": self.color,
                "footer": self.footer,
                "footer_icon": self.footer_icon,
                "ts": self.ts,
                "mrkdwn_in": ["text"],
            }],
        })
    }
}
