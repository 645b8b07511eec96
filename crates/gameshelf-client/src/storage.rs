//! Persistence adapters for store snapshots
//!
//! Stores write a `{"state": ..., "version": 0}` envelope under a fixed key.
//! Adapters only move JSON values; they know nothing about store layouts.

use crate::StorageError;
use async_trait::async_trait;
use gameshelf_config::ClientConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Version written into every snapshot envelope
pub const SNAPSHOT_VERSION: u32 = 0;

/// Key-value storage for persisted store state
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Read the value stored under `key`
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replace the value stored under `key`
    async fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    /// Delete `key`; missing keys are not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize)]
struct Snapshot<T> {
    state: T,
    version: u32,
}

/// Read a store snapshot
///
/// A snapshot that is not valid JSON or no longer matches the store layout
/// is logged and treated as absent.
pub(crate) async fn load_snapshot<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let value = match storage.load(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(StorageError::Json(e)) => {
            warn!("Ignoring corrupt snapshot '{}': {}", key, e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_value::<Snapshot<T>>(value) {
        Ok(snapshot) => Ok(Some(snapshot.state)),
        Err(e) => {
            warn!("Ignoring unreadable snapshot '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Write a store snapshot
pub(crate) async fn save_snapshot<T: Serialize>(
    storage: &dyn StateStorage,
    key: &str,
    state: &T,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(Snapshot {
        state,
        version: SNAPSHOT_VERSION,
    })?;
    storage.save(key, &value).await
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for snapshots; it is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the configured `storage_dir`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.storage_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write then rename so a crash never leaves half a snapshot
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Saved snapshot {}", path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
