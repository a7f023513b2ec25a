//! Lead-in line rendering using Handlebars.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;

/// Variables available to the lead-in format.
#[derive(Debug, Clone, Serialize)]
pub struct LeadInData<'a> {
    /// Slack link to the release author's profile, shown as `@login`.
    pub author_link: &'a str,

    /// Slack link to the release page, shown as the repository slug.
    pub release_link: &'a str,

    /// Release author login.
    pub author: &'a str,

    /// Repository slug.
    pub slug: &'a str,

    /// Release name.
    pub release_name: &'a str,
}

/// Creates a Handlebars registry for chat message formats.
///
/// The registry is configured with:
/// - No HTML escaping (Slack links contain `<` and `>`)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders the configurable parts of a notification.
pub struct MessageRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the lead-in line.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid or references an unknown variable.
    pub fn render_lead_in(
        &self,
        format: &str,
        data: &LeadInData<'_>,
    ) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render_template(format, data)?)
    }
}
