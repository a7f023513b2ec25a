//! Release data returned by the GitHub releases API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published (or draft) GitHub release.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Release {
    /// Git tag the release points at.
    pub tag_name: String,

    /// Release title; GitHub returns `null` when none was set.
    #[serde(default)]
    pub name: Option<String>,

    /// Release notes in GitHub markdown.
    #[serde(default)]
    pub body: Option<String>,

    /// Release page URL.
    pub html_url: String,

    /// When the release was created.
    pub created_at: DateTime<Utc>,

    /// Account that created the release.
    pub author: ReleaseAuthor,

    /// Whether the release is an unpublished draft.
    #[serde(default)]
    pub draft: bool,
}

/// The account that created a release.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReleaseAuthor {
    /// Account login.
    pub login: String,

    /// Profile URL.
    pub html_url: String,
}

impl Release {
    /// Returns the release name, falling back to the tag when the name is blank.
    ///
    /// This is the key recorded in the release state map.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// Picks the most recent non-draft release.
///
/// GitHub lists releases newest first, so this is the first entry that is not a draft.
pub fn latest_published(releases: Vec<Release>) -> Option<Release> {
    releases.into_iter().find(|release| !release.draft)
}
