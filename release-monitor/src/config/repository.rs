//! Repository identifiers parsed from `owner/repo` strings.

use crate::config::ConfigError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// A monitored GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,
}

impl RepositoryRef {
    /// Parses an `owner/repo` string.
    ///
    /// Both parts must be non-empty, contain no whitespace, and be separated
    /// by exactly one `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] if the string is malformed.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRepository {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        let (owner, repo) = value
            .split_once('/')
            .ok_or_else(|| invalid("expected <owner>/<repo>"))?;

        if repo.contains('/') {
            return Err(invalid("expected exactly one '/'"));
        }
        if owner.is_empty() {
            return Err(invalid("owner is empty"));
        }
        if repo.is_empty() {
            return Err(invalid("repository name is empty"));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Returns the `owner/repo` slug used as the state key.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Resolves configured repository strings, preserving order.
///
/// Repeated entries are dropped with a warning so a slug is only processed
/// once per run.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidRepository`] encountered.
pub fn resolve_repositories<S: AsRef<str>>(
    entries: &[S],
) -> Result<Vec<RepositoryRef>, ConfigError> {
    let mut seen = HashSet::new();
    let mut repositories = Vec::with_capacity(entries.len());

    for entry in entries {
        let repository = RepositoryRef::parse(entry.as_ref())?;
        if seen.insert(repository.clone()) {
            repositories.push(repository);
        } else {
            warn!(repo = %repository, "Repository listed more than once, ignoring duplicate");
        }
    }

    Ok(repositories)
}
