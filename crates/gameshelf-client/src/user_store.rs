//! User preferences

use crate::StorageError;
use crate::platforms::IgdbPlatform;
use crate::storage::{StateStorage, load_snapshot, save_snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::debug;

/// Storage key of the user store snapshot
pub const USER_STORE_KEY: &str = "user-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_language")]
    pub language: String,

    /// Owned platforms in the order they were added
    #[serde(default)]
    pub platforms: Vec<IgdbPlatform>,

    #[serde(default)]
    pub theme_mode: ThemeMode,
}

fn default_language() -> String {
    "de".to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            platforms: Vec::new(),
            theme_mode: ThemeMode::default(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedUser {
    #[serde(default)]
    user_settings: UserSettings,
}

pub struct UserStore {
    storage: Arc<dyn StateStorage>,
    settings: watch::Sender<UserSettings>,
    persist_lock: Mutex<()>,
}

impl UserStore {
    pub async fn new(storage: Arc<dyn StateStorage>) -> Result<Self, StorageError> {
        let persisted: PersistedUser = load_snapshot(storage.as_ref(), USER_STORE_KEY)
            .await?
            .unwrap_or_default();
        let (settings, _) = watch::channel(persisted.user_settings);

        Ok(Self {
            storage,
            settings,
            persist_lock: Mutex::new(()),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<UserSettings> {
        self.settings.subscribe()
    }

    pub fn settings(&self) -> UserSettings {
        self.settings.borrow().clone()
    }

    pub fn owns_platform(&self, platform: IgdbPlatform) -> bool {
        self.settings.borrow().platforms.contains(&platform)
    }

    /// Returns false when the platform was already owned
    pub async fn add_platform(&self, platform: IgdbPlatform) -> Result<bool, StorageError> {
        let added = self.settings.send_if_modified(|settings| {
            if settings.platforms.contains(&platform) {
                return false;
            }
            settings.platforms.push(platform);
            true
        });

        if added {
            debug!("Added platform {}", platform);
            self.persist().await?;
        }
        Ok(added)
    }

    /// Returns false when the platform was not owned
    pub async fn remove_platform(&self, platform: IgdbPlatform) -> Result<bool, StorageError> {
        let removed = self.settings.send_if_modified(|settings| {
            let before = settings.platforms.len();
            settings.platforms.retain(|p| *p != platform);
            before != settings.platforms.len()
        });

        if removed {
            debug!("Removed platform {}", platform);
            self.persist().await?;
        }
        Ok(removed)
    }

    pub async fn change_language(&self, language: &str) -> Result<(), StorageError> {
        self.settings
            .send_modify(|settings| settings.language = language.to_string());
        self.persist().await
    }

    pub async fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.settings.send_modify(|settings| settings.theme_mode = mode);
        self.persist().await
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let _guard = self.persist_lock.lock().await;
        let snapshot = PersistedUser {
            user_settings: self.settings(),
        };
        save_snapshot(self.storage.as_ref(), USER_STORE_KEY, &snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    async fn store() -> (UserStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = UserStore::new(storage.clone()).await.unwrap();
        (store, storage)
    }

    #[tokio::test]
    async fn test_defaults() {
        let (store, _) = store().await;
        let settings = store.settings();

        assert_eq!(settings.language, "de");
        assert!(settings.platforms.is_empty());
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_add_platform_once() {
        let (store, _) = store().await;

        assert!(store.add_platform(IgdbPlatform::NintendoSwitch).await.unwrap());
        assert!(store.add_platform(IgdbPlatform::Pc).await.unwrap());
        assert!(!store.add_platform(IgdbPlatform::NintendoSwitch).await.unwrap());

        assert_eq!(
            store.settings().platforms,
            vec![IgdbPlatform::NintendoSwitch, IgdbPlatform::Pc]
        );
        assert!(store.owns_platform(IgdbPlatform::Pc));
    }

    #[tokio::test]
    async fn test_remove_absent_platform() {
        let (store, _) = store().await;
        store.add_platform(IgdbPlatform::PlayStation5).await.unwrap();
        let before = store.settings();

        assert!(!store.remove_platform(IgdbPlatform::XboxOne).await.unwrap());
        assert_eq!(store.settings(), before);

        assert!(store.remove_platform(IgdbPlatform::PlayStation5).await.unwrap());
        assert!(store.settings().platforms.is_empty());
    }

    #[tokio::test]
    async fn test_language_and_theme_persist() {
        let (store, storage) = store().await;
        store.add_platform(IgdbPlatform::SuperNintendo).await.unwrap();
        store.change_language("en").await.unwrap();
        store.set_theme_mode(ThemeMode::System).await.unwrap();

        assert_eq!(
            storage.load(USER_STORE_KEY).await.unwrap(),
            Some(json!({
                "state": {
                    "userSettings": {"language": "en", "platforms": [19], "themeMode": "system"}
                },
                "version": 0
            }))
        );

        let restored = UserStore::new(storage).await.unwrap();
        assert_eq!(restored.settings(), store.settings());
    }
}
