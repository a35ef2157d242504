//! `PersistenceAdapter` implementations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use docchat_core::error::{DocChatError, Result};
use docchat_core::persistence::{validate_key, PersistenceAdapter};
use tokio::sync::Mutex;

use super::atomic_file::AtomicFile;

/// File-backed key/value store: one `<key>.json` file per key in a directory.
///
/// Blocking file I/O runs on the blocking thread pool.
///
/// # Example
///
/// ```ignore
/// use docchat_infrastructure::storage::FileKeyValueStore;
///
/// let store = FileKeyValueStore::new("/tmp/docchat-state");
/// store.write("chat_app_state", "[]").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        validate_key(key)?;
        Ok(AtomicFile::new(self.dir.join(format!("{key}.json"))))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DocChatError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl PersistenceAdapter for FileKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || file.load().map_err(DocChatError::from)).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let value = value.to_string();
        tracing::debug!("[FileKeyValueStore] Writing {}", file.path().display());
        run_blocking(move || file.save(&value).map_err(DocChatError::from)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || file.remove().map_err(DocChatError::from)).await
    }
}

/// Volatile key/value store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

#[async_trait]
impl PersistenceAdapter for InMemoryKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
