//! Monitor configuration loading and validation.

use crate::config::{resolve_repositories, ConfigError, MessageFormat, RepositoryRef};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Configuration for a release monitor, parsed from a TOML file.
///
/// ```toml
/// name = "github-release-monitor"
/// repositories = ["acme/widgets"]
/// channels = ["general"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MonitorConfig {
    /// Monitor name, used as the key for persisted state.
    #[serde(default = "default_name")]
    pub name: String,

    /// Repositories to monitor in `owner/repo` form.
    pub repositories: Vec<String>,

    /// Chat channels every notification is sent to.
    pub channels: Vec<String>,

    /// GitHub token used for API calls (optional).
    #[serde(default)]
    pub token: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise (optional).
    #[serde(default)]
    pub api_url: Option<String>,

    /// Number of repositories processed at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Notification formatting.
    #[serde(default)]
    pub message: MessageFormat,
}

fn default_name() -> String {
    "github-release-monitor".to_string()
}

fn default_concurrency() -> usize {
    1
}

impl MonitorConfig {
    /// Creates a configuration with default options.
    pub fn new(repositories: Vec<String>, channels: Vec<String>, token: Option<String>) -> Self {
        Self {
            name: default_name(),
            repositories,
            channels,
            token,
            api_url: None,
            concurrency: default_concurrency(),
            message: MessageFormat::default(),
        }
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading monitor config");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::parse(&content, path)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Parses TOML content without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] if the content is not valid TOML for this schema.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid field.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty".to_string()));
        }

        if self.repositories.is_empty() {
            return Err(invalid("repositories cannot be empty".to_string()));
        }
        self.resolve_repositories()?;

        if self.channels.is_empty() {
            return Err(invalid("channels cannot be empty".to_string()));
        }
        if self.channels.iter().any(|c| c.trim().is_empty()) {
            return Err(invalid("channel names cannot be empty".to_string()));
        }

        if self.concurrency == 0 {
            return Err(invalid("concurrency must be at least 1".to_string()));
        }

        if let Some(api_url) = &self.api_url {
            Url::parse(api_url).map_err(|e| invalid(format!("invalid api-url: {e}")))?;
        }

        Url::parse(&self.message.footer_icon)
            .map_err(|e| invalid(format!("invalid message.footer-icon: {e}")))?;

        handlebars::Template::compile(&self.message.lead_in_format)
            .map_err(|e| invalid(format!("invalid message.lead-in-format: {e}")))?;

        Ok(())
    }

    /// Resolves the configured repository strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepository`] if any entry is malformed.
    pub fn resolve_repositories(&self) -> Result<Vec<RepositoryRef>, ConfigError> {
        resolve_repositories(&self.repositories)
    }
}
