//! Orchestrates a release monitoring run.

mod collaborators;
mod error;

pub use collaborators::Collaborators;
pub use error::{RepositoryError, RunnerError};

use crate::config::{MonitorConfig, RepositoryRef};
use crate::enrich::enrich;
use crate::github::fetch_latest_release;
use crate::notify::{compose, MessageRenderer};
use crate::state::ReleaseStateMap;
use crate::summary::{ProcessingResult, RunSummary};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

/// Runs one monitoring pass over the configured repositories.
pub struct Runner {
    config: MonitorConfig,
    repositories: Vec<RepositoryRef>,
    collaborators: Collaborators,
    renderer: MessageRenderer,
    dry_run: bool,
}

impl Runner {
    /// Builds a runner from the provided configuration and collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if a repository entry is malformed.
    pub fn new(config: MonitorConfig, collaborators: Collaborators) -> Result<Self, RunnerError> {
        let repositories = config.resolve_repositories()?;
        Ok(Self {
            config,
            repositories,
            collaborators,
            renderer: MessageRenderer::new(),
            dry_run: false,
        })
    }

    /// Skips saving state at the end of the run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Executes the full run.
    ///
    /// State is hydrated once, each repository is processed in isolation, and
    /// the updated state is saved once. A repository's entry is only updated
    /// after its notification was sent.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::State`] if state cannot be loaded or saved.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.dry_run);

        info!(name = %self.config.name, "Loading release state");
        let mut state = self.collaborators.store.hydrate(&self.config.name).await?;
        info!(
            count = self.repositories.len(),
            known = state.len(),
            "Monitoring repositories"
        );

        let results: Vec<ProcessingResult> = {
            let state = &state;
            stream::iter(&self.repositories)
                .map(|repository| self.process_repository(repository, state))
                .buffered(self.config.concurrency.max(1))
                .collect()
                .await
        };

        for result in &results {
            if let ProcessingResult::Notified { release, .. } = result {
                state.record(result.repository(), release);
            }
            summary.record_result(result);
        }

        if self.dry_run {
            info!("Dry run, not saving release state");
        } else {
            self.collaborators
                .store
                .save(&self.config.name, &state)
                .await?;
            info!(known = state.len(), "Saved release state");
        }

        Ok(summary)
    }

    async fn process_repository(
        &self,
        repository: &RepositoryRef,
        state: &ReleaseStateMap,
    ) -> ProcessingResult {
        let slug = repository.slug();
        let span = info_span!("repository", repo = %slug);

        async {
            info!("Monitoring repository");
            match self.check_repository(repository, &slug, state).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Error monitoring repository");
                    ProcessingResult::Failed {
                        repository: slug.clone(),
                        error: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn check_repository(
        &self,
        repository: &RepositoryRef,
        slug: &str,
        state: &ReleaseStateMap,
    ) -> Result<ProcessingResult, RepositoryError> {
        let collaborators = &self.collaborators;

        let Some(release) =
            fetch_latest_release(collaborators.provider.as_ref(), repository).await?
        else {
            info!("No published release");
            return Ok(ProcessingResult::Skipped {
                repository: slug.to_string(),
                reason: "no published release".to_string(),
            });
        };

        let release_name = release.display_name();
        if !state.is_new_release(slug, release_name) {
            debug!(release = release_name, "Release already announced");
            return Ok(ProcessingResult::Unchanged {
                repository: slug.to_string(),
                release: release_name.to_string(),
            });
        }

        info!(
            release = release_name,
            previous = ?state.get(slug),
            "New release found"
        );

        let enrichment = enrich(
            collaborators.provider.as_ref(),
            collaborators.images.as_ref(),
            collaborators.colors.as_ref(),
            &repository.owner,
        )
        .await?;

        let notification = compose(
            &release,
            &enrichment,
            slug,
            &self.config.channels,
            &self.config.message,
            &self.renderer,
        )?;

        collaborators.sink.send(&notification).await?;
        info!(release = release_name, "Release notification sent");

        Ok(ProcessingResult::Notified {
            repository: slug.to_string(),
            release: release_name.to_string(),
        })
    }
}
