//! Release and profile lookups against GitHub.
//!
//! The pipeline talks to GitHub through the [`RepositoryProvider`] trait;
//! [`GitHubProvider`] is the octocrab-backed implementation.

mod error;
mod release;

pub use error::FetchError;
pub use release::{latest_published, Release, ReleaseAuthor};

use crate::config::RepositoryRef;
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};

/// Source of release and account data.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Lists the first page of releases for a repository, newest first.
    async fn list_releases(&self, repository: &RepositoryRef) -> Result<Vec<Release>, FetchError>;

    /// Returns the avatar URL of an organization.
    ///
    /// Fails when `org` is not an organization.
    async fn organization_avatar(&self, org: &str) -> Result<String, FetchError>;

    /// Returns the avatar URL of a user account.
    async fn user_avatar(&self, username: &str) -> Result<String, FetchError>;
}

/// Subset of the organization and user profile payloads.
#[derive(Debug, Deserialize)]
struct Profile {
    avatar_url: String,
}

/// [`RepositoryProvider`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubProvider {
    octocrab: Octocrab,
}

impl GitHubProvider {
    /// Builds a provider, optionally authenticated and pointed at a custom API URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the client cannot be built or the URL is invalid.
    pub fn new(token: Option<&str>, api_url: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url)?;
        }
        Ok(Self {
            octocrab: builder.build()?,
        })
    }
}

#[async_trait]
impl RepositoryProvider for GitHubProvider {
    async fn list_releases(&self, repository: &RepositoryRef) -> Result<Vec<Release>, FetchError> {
        let route = format!("/repos/{}/{}/releases", repository.owner, repository.repo);
        debug!(route = %route, "Listing releases");
        let releases: Vec<Release> = self.octocrab.get(route, None::<&()>).await?;
        Ok(releases)
    }

    async fn organization_avatar(&self, org: &str) -> Result<String, FetchError> {
        let profile: Profile = self.octocrab.get(format!("/orgs/{org}"), None::<&()>).await?;
        Ok(profile.avatar_url)
    }

    async fn user_avatar(&self, username: &str) -> Result<String, FetchError> {
        let profile: Profile = self
            .octocrab
            .get(format!("/users/{username}"), None::<&()>)
            .await?;
        Ok(profile.avatar_url)
    }
}

/// Fetches the most recent non-draft release of a repository.
///
/// Returns `Ok(None)` if the repository has no published release.
///
/// # Errors
///
/// Returns [`FetchError`] if the release list cannot be fetched.
pub async fn fetch_latest_release(
    provider: &dyn RepositoryProvider,
    repository: &RepositoryRef,
) -> Result<Option<Release>, FetchError> {
    let span = info_span!("fetch_latest_release", repo = %repository);

    async {
        let releases = provider.list_releases(repository).await?;
        debug!(count = releases.len(), "Fetched releases");
        Ok(latest_published(releases))
    }
    .instrument(span)
    .await
}
