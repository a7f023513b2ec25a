//! External collaborators used by a run.

use crate::config::MonitorConfig;
use crate::enrich::{ColorExtractor, HttpImageFetcher, ImageFetcher, PaletteExtractor};
use crate::github::{GitHubProvider, RepositoryProvider};
use crate::notify::ChatSink;
use crate::runner::RunnerError;
use crate::state::StateStore;
use std::sync::Arc;

/// The services a [`Runner`](crate::Runner) talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Release and profile lookups.
    pub provider: Arc<dyn RepositoryProvider>,

    /// Avatar downloads.
    pub images: Arc<dyn ImageFetcher>,

    /// Accent color extraction.
    pub colors: Arc<dyn ColorExtractor>,

    /// Notification delivery.
    pub sink: Arc<dyn ChatSink>,

    /// Release state persistence.
    pub store: Arc<dyn StateStore>,
}

impl Collaborators {
    /// Builds GitHub-backed collaborators for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if an HTTP client cannot be built.
    pub fn github(
        config: &MonitorConfig,
        sink: Arc<dyn ChatSink>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, RunnerError> {
        let provider = GitHubProvider::new(config.token.as_deref(), config.api_url.as_deref())?;
        Ok(Self {
            provider: Arc::new(provider),
            images: Arc::new(HttpImageFetcher::new()?),
            colors: Arc::new(PaletteExtractor::default()),
            sink,
            store,
        })
    }
}
