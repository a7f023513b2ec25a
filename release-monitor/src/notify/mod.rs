//! Release notification composition and delivery.
//!
//! This module turns a release plus its enrichment into a [`Notification`]
//! and delivers it through a [`ChatSink`].

mod error;
mod markup;
mod message;
mod renderer;
mod sink;

pub use error::{SendError, TemplateError};
pub use markup::{github_to_slack, slack_link};
pub use message::Notification;
pub use renderer::{create_handlebars_registry, LeadInData, MessageRenderer};
pub use sink::{ChatSink, DryRunSink, SlackClient, SLACK_API_URL};

use crate::config::MessageFormat;
use crate::enrich::Enrichment;
use crate::github::Release;

/// Composes the notification for a newly observed release.
///
/// # Errors
///
/// Returns [`TemplateError`] if the lead-in format fails to render.
pub fn compose(
    release: &Release,
    enrichment: &Enrichment,
    slug: &str,
    channels: &[String],
    format: &MessageFormat,
    renderer: &MessageRenderer,
) -> Result<Notification, TemplateError> {
    let release_name = release.display_name();
    let author_link = slack_link(
        &release.author.html_url,
        &format!("@{}", release.author.login),
    );
    let release_link = slack_link(&release.html_url, slug);

    let text = renderer.render_lead_in(
        &format.lead_in_format,
        &LeadInData {
            author_link: &author_link,
            release_link: &release_link,
            author: &release.author.login,
            slug,
            release_name,
        },
    )?;

    Ok(Notification {
        text,
        title: release_name.to_string(),
        body: github_to_slack(release.body.as_deref().unwrap_or_default()),
        author_link: release.html_url.clone(),
        author_icon: enrichment.avatar_url.clone(),
        color: enrichment.accent_color.clone(),
        footer: release_link,
        footer_icon: format.footer_icon.clone(),
        ts: release.created_at.timestamp(),
        channels: channels.to_vec(),
    })
}
