//! Persistent client-side key-value storage.
//!
//! The session is mirrored into exactly three entries (see [`keys`]). The
//! [`KeyValueStore`] port has an in-memory implementation for tests and
//! embedding, and a JSON-file implementation used by the CLI.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

/// Storage keys for persisted session data.
pub mod keys {
    /// Key for the bearer access token.
    pub const TOKEN: &str = "ecommerce-jwt-token";

    /// Key for the JSON-serialized user profile.
    pub const USER: &str = "ecommerce-user-data";

    /// Key for the user id.
    pub const USER_ID: &str = "ecommerce-user-id";

    /// Every key owned by the session.
    pub const ALL: [&str; 3] = [TOKEN, USER, USER_ID];
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt storage file: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// File store
// =============================================================================

/// Store persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written file behind. Reads of a
/// corrupt file fail; writes replace it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to build a write on, and whether the file on disk was
    /// unreadable and must be rewritten.
    async fn read_for_update(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.read_all().await {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut entries, _) = self.read_for_update().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let (mut entries, corrupt) = self.read_for_update().await?;
        if entries.remove(key).is_some() || corrupt {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}
