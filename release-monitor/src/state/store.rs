//! Durable storage for [`ReleaseStateMap`]s.

use crate::state::{ReleaseStateMap, StateError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

/// Key-value store holding one state map per monitor.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the state for `key`, or an empty map if none was saved.
    async fn hydrate(&self, key: &str) -> Result<ReleaseStateMap, StateError>;

    /// Replaces the state for `key`.
    async fn save(&self, key: &str, state: &ReleaseStateMap) -> Result<(), StateError>;
}

/// Stores each key as a pretty-printed JSON file, `<directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `directory`. The directory is created on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the file path for a key.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidKey`] if the key is not a plain file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StateError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StateError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StateError + '_ {
    move |source| StateError::IoError {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn hydrate(&self, key: &str) -> Result<ReleaseStateMap, StateError> {
        let path = self.path_for(key)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No saved state, starting empty");
                return Ok(ReleaseStateMap::new());
            }
            Err(e) => return Err(io_error(&path)(e)),
        };

        serde_json::from_str(&content).map_err(|e| StateError::JsonError {
            path: path.display().to_string(),
            source: e,
        })
    }

    async fn save(&self, key: &str, state: &ReleaseStateMap) -> Result<(), StateError> {
        let path = self.path_for(key)?;

        std::fs::create_dir_all(&self.directory).map_err(io_error(&self.directory))?;

        let content = serde_json::to_string_pretty(state).map_err(|e| StateError::JsonError {
            path: path.display().to_string(),
            source: e,
        })?;

        // Write next to the target so the rename stays on one filesystem.
        let mut file = NamedTempFile::new_in(&self.directory).map_err(io_error(&path))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .map_err(io_error(&path))?;
        file.persist(&path).map_err(|e| StateError::PersistError {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!(path = %path.display(), repositories = state.len(), "Saved state");
        Ok(())
    }
}

/// In-process [`StateStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, ReleaseStateMap>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `state` under `key`.
    #[must_use]
    pub fn with_state(key: &str, state: ReleaseStateMap) -> Self {
        Self {
            entries: Mutex::new(HashMap::from([(key.to_string(), state)])),
        }
    }

    /// Returns the saved state for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<ReleaseStateMap> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn hydrate(&self, key: &str) -> Result<ReleaseStateMap, StateError> {
        Ok(self.get(key).await.unwrap_or_default())
    }

    async fn save(&self, key: &str, state: &ReleaseStateMap) -> Result<(), StateError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), state.clone());
        Ok(())
    }
}
