//! Last-notified release tracking.
//!
//! [`ReleaseStateMap`] records, per repository slug, the name of the last
//! release a notification was sent for. It is hydrated from a [`StateStore`]
//! at the start of a run and saved once at the end.

mod error;
mod store;

pub use error::StateError;
pub use store::{JsonFileStore, MemoryStore, StateStore};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map from repository slug to the last notified release name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseStateMap(BTreeMap<String, String>);

impl ReleaseStateMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last notified release name for a slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&str> {
        self.0.get(slug).map(String::as_str)
    }

    /// Returns true if `release_name` has not been notified for `slug`.
    ///
    /// Releases are compared by name only.
    #[must_use]
    pub fn is_new_release(&self, slug: &str, release_name: &str) -> bool {
        self.get(slug) != Some(release_name)
    }

    /// Records that `release_name` was notified for `slug`.
    ///
    /// Returns the previously recorded name.
    pub fn record(&mut self, slug: &str, release_name: &str) -> Option<String> {
        self.0.insert(slug.to_string(), release_name.to_string())
    }

    /// Number of tracked repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no repository has been notified yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReleaseStateMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(slug, name)| (slug.into(), name.into()))
                .collect(),
        )
    }
}
