//! Search history and search preferences

use crate::StorageError;
use crate::storage::{StateStorage, load_snapshot, save_snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Storage key of the search store snapshot
pub const SEARCH_STORE_KEY: &str = "search-storage";

/// Queries kept in the history
pub const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    /// Most recent query first
    #[serde(default)]
    pub search_history: Vec<String>,
    #[serde(default)]
    pub selected_platform: Option<String>,
    #[serde(default)]
    pub filters: SearchFilters,
}

pub struct SearchStore {
    storage: Arc<dyn StateStorage>,
    preferences: watch::Sender<SearchPreferences>,
    persist_lock: Mutex<()>,
}

impl SearchStore {
    pub async fn new(storage: Arc<dyn StateStorage>) -> Result<Self, StorageError> {
        let preferences = load_snapshot(storage.as_ref(), SEARCH_STORE_KEY)
            .await?
            .unwrap_or_default();
        let (preferences, _) = watch::channel(preferences);

        Ok(Self {
            storage,
            preferences,
            persist_lock: Mutex::new(()),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchPreferences> {
        self.preferences.subscribe()
    }

    pub fn preferences(&self) -> SearchPreferences {
        self.preferences.borrow().clone()
    }

    /// Move `query` to the front of the history
    pub async fn add_to_history(&self, query: &str) -> Result<(), StorageError> {
        self.preferences.send_modify(|prefs| {
            prefs.search_history.retain(|q| q != query);
            prefs.search_history.insert(0, query.to_string());
            prefs.search_history.truncate(MAX_HISTORY);
        });
        self.persist().await
    }

    pub async fn clear_history(&self) -> Result<(), StorageError> {
        self.preferences
            .send_modify(|prefs| prefs.search_history.clear());
        self.persist().await
    }

    pub async fn set_selected_platform(&self, platform: Option<&str>) -> Result<(), StorageError> {
        self.preferences
            .send_modify(|prefs| prefs.selected_platform = platform.map(str::to_string));
        self.persist().await
    }

    pub async fn set_filters(&self, filters: SearchFilters) -> Result<(), StorageError> {
        self.preferences.send_modify(|prefs| prefs.filters = filters);
        self.persist().await
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.preferences();
        save_snapshot(self.storage.as_ref(), SEARCH_STORE_KEY, &snapshot).await
    }
}
