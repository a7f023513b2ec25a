//! Message formatting options.

use serde::Deserialize;

/// Formatting options for release notifications, read from the `[message]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessageFormat {
    /// Handlebars format for the lead-in line of each notification.
    #[serde(default = "default_lead_in_format")]
    pub lead_in_format: String,

    /// Icon shown next to the footer link.
    #[serde(default = "default_footer_icon")]
    pub footer_icon: String,
}

impl Default for MessageFormat {
    fn default() -> Self {
        Self {
            lead_in_format: default_lead_in_format(),
            footer_icon: default_footer_icon(),
        }
    }
}

/// Default lead-in: `<@author> created new release in <owner/repo>`.
pub fn default_lead_in_format() -> String {
    "{{author_link}} created new release in {{release_link}}".to_string()
}

/// Default footer icon, the grey GitHub mark.
pub fn default_footer_icon() -> String {
    "https://images.atomist.com/rug/github_grey.png".to_string()
}
