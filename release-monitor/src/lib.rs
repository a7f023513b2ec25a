#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod enrich;
pub mod github;
pub mod notify;
pub mod runner;
pub mod state;
pub mod summary;

pub use config::{resolve_repositories, ConfigError, MessageFormat, MonitorConfig, RepositoryRef};
pub use enrich::{
    enrich, extract_accent_color, resolve_avatar, AccentColor, ColorExtractor, Enrichment,
    EnrichmentError, FetchedImage, HttpImageFetcher, ImageFetcher, PaletteExtractor, Rgb,
};
pub use github::{
    fetch_latest_release, latest_published, FetchError, GitHubProvider, Release, ReleaseAuthor,
    RepositoryProvider,
};
pub use notify::{
    compose, github_to_slack, ChatSink, DryRunSink, MessageRenderer, Notification, SendError,
    SlackClient, TemplateError,
};
pub use runner::{Collaborators, RepositoryError, Runner, RunnerError};
pub use state::{JsonFileStore, MemoryStore, ReleaseStateMap, StateError, StateStore};
pub use summary::{ProcessingResult, RunSummary};
