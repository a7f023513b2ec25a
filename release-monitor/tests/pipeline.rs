use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use release_monitor::{
    ChatSink, Collaborators, ColorExtractor, EnrichmentError, FetchError, FetchedImage,
    ImageFetcher, MemoryStore, MonitorConfig, Notification, Release, ReleaseAuthor,
    ReleaseStateMap, RepositoryProvider, RepositoryRef, Rgb, Runner, RunnerError, SendError,
    StateError, StateStore,
};

const MONITOR: &str = "github-release-monitor";

fn release(name: &str, draft: bool) -> Release {
    Release {
        tag_name: name.to_string(),
        name: Some(name.to_string()),
        body: Some(format!("Release notes for **{name}**")),
        html_url: format!("https://github.com/acme/widgets/releases/tag/{name}"),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        author: ReleaseAuthor {
            login: "bob".to_string(),
            html_url: "https://github.com/bob".to_string(),
        },
        draft,
    }
}

#[derive(Default)]
struct FakeGitHub {
    releases: Mutex<HashMap<String, Result<Vec<Release>, String>>>,
    organizations: HashMap<String, String>,
    users: HashMap<String, String>,
}

impl FakeGitHub {
    fn set_releases(&self, slug: &str, releases: Vec<Release>) {
        self.releases
            .lock()
            .unwrap()
            .insert(slug.to_string(), Ok(releases));
    }

    fn fail_releases(&self, slug: &str) {
        self.releases
            .lock()
            .unwrap()
            .insert(slug.to_string(), Err("connection reset".to_string()));
    }
}

#[async_trait]
impl RepositoryProvider for FakeGitHub {
    async fn list_releases(&self, repository: &RepositoryRef) -> Result<Vec<Release>, FetchError> {
        match self.releases.lock().unwrap().get(&repository.slug()) {
            Some(Ok(releases)) => Ok(releases.clone()),
            Some(Err(message)) => Err(FetchError::RequestFailed {
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn organization_avatar(&self, org: &str) -> Result<String, FetchError> {
        self.organizations
            .get(org)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                resource: format!("orgs/{org}"),
            })
    }

    async fn user_avatar(&self, username: &str) -> Result<String, FetchError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                resource: format!("users/{username}"),
            })
    }
}

struct FakeImages;

#[async_trait]
impl ImageFetcher for FakeImages {
    async fn fetch(&self, _url: &str) -> Result<FetchedImage, EnrichmentError> {
        Ok(FetchedImage {
            bytes: vec![0x89, b'P', b'N', b'G'],
            mime_type: Some("image/png".to_string()),
        })
    }
}

struct FakeColors(Vec<Rgb>);

impl ColorExtractor for FakeColors {
    fn extract_colors(
        &self,
        _bytes: &[u8],
        _mime_type: Option<&str>,
    ) -> Result<Vec<Rgb>, EnrichmentError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingSink {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Rejected {
                channel: notification.channels.join(","),
                error: "channel_not_found".to_string(),
            });
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Store whose writes always fail, and whose reads fail when `fail_hydrate` is set.
struct FailingStore {
    fail_hydrate: bool,
}

fn denied(key: &str) -> StateError {
    StateError::IoError {
        path: format!("{key}.json"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"),
    }
}

#[async_trait]
impl StateStore for FailingStore {
    async fn hydrate(&self, key: &str) -> Result<ReleaseStateMap, StateError> {
        if self.fail_hydrate {
            return Err(denied(key));
        }
        Ok(ReleaseStateMap::new())
    }

    async fn save(&self, key: &str, _state: &ReleaseStateMap) -> Result<(), StateError> {
        Err(denied(key))
    }
}

struct Harness {
    github: Arc<FakeGitHub>,
    sink: Arc<RecordingSink>,
    store: Arc<MemoryStore>,
    palette: Vec<Rgb>,
}

impl Harness {
    fn new(github: FakeGitHub) -> Self {
        Self::with_store(github, MemoryStore::new())
    }

    fn with_store(github: FakeGitHub, store: MemoryStore) -> Self {
        Self {
            github: Arc::new(github),
            sink: Arc::new(RecordingSink::default()),
            store: Arc::new(store),
            palette: vec![Rgb { r: 0x33, g: 0x66, b: 0x99 }],
        }
    }

    fn runner(&self, config: MonitorConfig) -> Runner {
        self.runner_with_store(config, self.store.clone())
    }

    fn runner_with_store(&self, config: MonitorConfig, store: Arc<dyn StateStore>) -> Runner {
        let collaborators = Collaborators {
            provider: self.github.clone(),
            images: Arc::new(FakeImages),
            colors: Arc::new(FakeColors(self.palette.clone())),
            sink: self.sink.clone(),
            store,
        };
        Runner::new(config, collaborators).unwrap()
    }

    async fn state(&self) -> Option<ReleaseStateMap> {
        self.store.get(MONITOR).await
    }
}

fn config(repositories: &[&str]) -> MonitorConfig {
    MonitorConfig::new(
        repositories.iter().map(|r| r.to_string()).collect(),
        vec!["general".to_string()],
        None,
    )
}

fn acme_github() -> FakeGitHub {
    FakeGitHub {
        organizations: HashMap::from([(
            "acme".to_string(),
            "https://avatars.githubusercontent.com/u/100".to_string(),
        )]),
        ..Default::default()
    }
}

#[tokio::test]
async fn first_release_is_announced_and_recorded() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    let sent = harness.sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channels, vec!["general"]);
    assert!(sent[0].text.contains("created new release in"));
    assert!(sent[0].text.contains("acme/widgets"));
    assert!(sent[0].text.contains("<https://github.com/bob|@bob>"));
    assert_eq!(sent[0].title, "v1.0");
    assert_eq!(sent[0].body, "Release notes for *v1.0*");
    assert_eq!(sent[0].author_icon, "https://avatars.githubusercontent.com/u/100");
    assert_eq!(sent[0].color.as_str(), "#336699");
    assert_eq!(sent[0].ts, 1_714_564_800);

    let expected: ReleaseStateMap = [("acme/widgets", "v1.0")].into_iter().collect();
    assert_eq!(harness.state().await, Some(expected));
    assert_eq!(summary.notifications_sent, 1);
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn unchanged_release_is_not_announced_again() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    harness.runner(config(&["acme/widgets"])).run().await.unwrap();
    harness.sink.clear();
    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    assert!(harness.sink.sent().is_empty());
    assert_eq!(summary.notifications_sent, 0);
    assert_eq!(summary.unchanged, 1);
    let expected: ReleaseStateMap = [("acme/widgets", "v1.0")].into_iter().collect();
    assert_eq!(harness.state().await, Some(expected));
}

#[tokio::test]
async fn renamed_release_is_announced_once() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);
    harness.runner(config(&["acme/widgets"])).run().await.unwrap();
    harness.sink.clear();

    harness.github.set_releases(
        "acme/widgets",
        vec![release("v1.1", false), release("v1.0", false)],
    );
    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    let sent = harness.sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "v1.1");
    assert_eq!(summary.notifications_sent, 1);
    let state = harness.state().await.unwrap();
    assert_eq!(state.get("acme/widgets"), Some("v1.1"));
}

#[tokio::test]
async fn drafts_are_never_announced() {
    let harness = Harness::new(acme_github());
    harness.github.set_releases(
        "acme/widgets",
        vec![release("v2.0-draft", true), release("v1.0", false)],
    );
    harness
        .github
        .set_releases("acme/gadgets", vec![release("v0.1-draft", true)]);

    let summary = harness
        .runner(config(&["acme/widgets", "acme/gadgets"]))
        .run()
        .await
        .unwrap();

    let sent = harness.sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "v1.0");
    assert_eq!(summary.skipped, 1);

    let state = harness.state().await.unwrap();
    assert_eq!(state.get("acme/widgets"), Some("v1.0"));
    assert_eq!(state.get("acme/gadgets"), None);
}

#[tokio::test]
async fn user_owned_repository_uses_user_avatar() {
    let github = FakeGitHub {
        users: HashMap::from([(
            "bob".to_string(),
            "https://avatars.githubusercontent.com/u/7".to_string(),
        )]),
        ..Default::default()
    };
    let harness = Harness::new(github);
    harness
        .github
        .set_releases("bob/dotfiles", vec![release("v1.0", false)]);

    let summary = harness.runner(config(&["bob/dotfiles"])).run().await.unwrap();

    let sent = harness.sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].author_icon, "https://avatars.githubusercontent.com/u/7");
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn failing_repository_does_not_block_others() {
    let harness = Harness::new(acme_github());
    harness.github.fail_releases("acme/broken");
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let summary = harness
        .runner(config(&["acme/broken", "acme/widgets"]))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.notifications_sent, 1);
    assert!(summary.has_failures());

    let state = harness.state().await.unwrap();
    assert_eq!(state.get("acme/widgets"), Some("v1.0"));
    assert_eq!(state.get("acme/broken"), None);
}

#[tokio::test]
async fn failed_delivery_is_retried_next_run() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);
    harness.sink.failing.store(true, Ordering::SeqCst);

    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert!(harness.state().await.unwrap().is_empty());

    harness.sink.failing.store(false, Ordering::SeqCst);
    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    assert_eq!(summary.notifications_sent, 1);
    assert_eq!(harness.sink.sent().len(), 1);
    assert_eq!(
        harness.state().await.unwrap().get("acme/widgets"),
        Some("v1.0")
    );
}

#[tokio::test]
async fn enrichment_failure_keeps_previous_state() {
    let previous: ReleaseStateMap = [("acme/widgets", "v0.9")].into_iter().collect();
    let mut harness = Harness::with_store(
        acme_github(),
        MemoryStore::with_state(MONITOR, previous.clone()),
    );
    harness.palette = Vec::new();
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let summary = harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert!(harness.sink.sent().is_empty());
    assert_eq!(harness.state().await, Some(previous));
}

#[tokio::test]
async fn dry_run_does_not_save_state() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let summary = harness
        .runner(config(&["acme/widgets"]))
        .with_dry_run(true)
        .run()
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(harness.sink.sent().len(), 1);
    assert_eq!(harness.state().await, None);
}

#[tokio::test]
async fn concurrent_run_records_every_repository() {
    let harness = Harness::new(acme_github());
    for repo in ["acme/one", "acme/two", "acme/three"] {
        harness.github.set_releases(repo, vec![release("v1.0", false)]);
    }
    let mut config = config(&["acme/one", "acme/two", "acme/three", "acme/one"]);
    config.concurrency = 3;

    let summary = harness.runner(config).run().await.unwrap();

    assert_eq!(summary.repositories_checked, 3);
    assert_eq!(summary.notifications_sent, 3);
    assert_eq!(harness.state().await.unwrap().len(), 3);
}

#[tokio::test]
async fn untracked_entries_survive_a_run() {
    let previous: ReleaseStateMap = [("old/project", "v3.0")].into_iter().collect();
    let harness = Harness::with_store(acme_github(), MemoryStore::with_state(MONITOR, previous));
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    harness.runner(config(&["acme/widgets"])).run().await.unwrap();

    let state = harness.state().await.unwrap();
    assert_eq!(state.get("old/project"), Some("v3.0"));
    assert_eq!(state.get("acme/widgets"), Some("v1.0"));
}

#[tokio::test]
async fn failed_save_is_reported_after_sending() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let store = Arc::new(FailingStore { fail_hydrate: false });

    let result = harness
        .runner_with_store(config(&["acme/widgets"]), store)
        .run()
        .await;

    assert!(matches!(
        result,
        Err(RunnerError::State(StateError::IoError { .. }))
    ));
    assert_eq!(harness.sink.sent().len(), 1);
}

#[tokio::test]
async fn failed_hydrate_sends_nothing() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let store = Arc::new(FailingStore { fail_hydrate: true });

    let result = harness
        .runner_with_store(config(&["acme/widgets"]), store)
        .run()
        .await;

    assert!(matches!(result, Err(RunnerError::State(_))));
    assert!(harness.sink.sent().is_empty());
}

#[tokio::test]
async fn dry_run_skips_failing_save() {
    let harness = Harness::new(acme_github());
    harness
        .github
        .set_releases("acme/widgets", vec![release("v1.0", false)]);

    let store = Arc::new(FailingStore { fail_hydrate: false });

    let summary = harness
        .runner_with_store(config(&["acme/widgets"]), store)
        .with_dry_run(true)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.notifications_sent, 1);
}
