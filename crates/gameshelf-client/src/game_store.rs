//! Search results, local library and favorites

use crate::StorageError;
use crate::api::SearchApi;
use crate::storage::{StateStorage, load_snapshot, save_snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Storage key of the game store snapshot
pub const GAME_STORE_KEY: &str = "game-store";

/// Entries shown by [`LibraryFilter::RecentlyAdded`]
pub const RECENTLY_ADDED_LIMIT: usize = 10;

/// A game as seen by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Platform the user owns this copy on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_platform: Option<String>,
}

impl Game {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            platforms: Vec::new(),
            summary: None,
            cover_url: None,
            release_date: None,
            genres: Vec::new(),
            user_platform: None,
        }
    }

    pub fn with_platforms<S: Into<String>>(mut self, platforms: impl IntoIterator<Item = S>) -> Self {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub search_results: Vec<Game>,
    /// One entry per (game, platform) pair, in insertion order
    pub user_library: Vec<Game>,
    pub favorites: Vec<Game>,
    pub is_searching: bool,
    pub error: Option<String>,
}

/// The persisted part of [`GameState`]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedGames {
    #[serde(default)]
    user_library: Vec<Game>,
    #[serde(default)]
    favorites: Vec<Game>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryFilter {
    #[default]
    All,
    Favorites,
    RecentlyAdded,
}

/// Game state with change notification and persistence
pub struct GameStore {
    api: Arc<dyn SearchApi>,
    storage: Arc<dyn StateStorage>,
    state: watch::Sender<GameState>,
    persist_lock: Mutex<()>,
}

impl GameStore {
    /// Create the store, restoring library and favorites from `storage`
    pub async fn new(
        api: Arc<dyn SearchApi>,
        storage: Arc<dyn StateStorage>,
    ) -> Result<Self, StorageError> {
        let persisted: PersistedGames = load_snapshot(storage.as_ref(), GAME_STORE_KEY)
            .await?
            .unwrap_or_default();
        info!(
            "Game store loaded: {} library entries, {} favorites",
            persisted.user_library.len(),
            persisted.favorites.len()
        );

        let (state, _) = watch::channel(GameState {
            user_library: persisted.user_library,
            favorites: persisted.favorites,
            ..GameState::default()
        });

        Ok(Self {
            api,
            storage,
            state,
            persist_lock: Mutex::new(()),
        })
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Search the backend and publish the results
    ///
    /// Failures are recorded in `error` and leave the results empty; the
    /// returned list is empty as well.
    pub async fn search_games(&self, term: &str, platform: Option<&str>) -> Vec<Game> {
        self.state.send_modify(|state| {
            state.is_searching = true;
            state.error = None;
        });

        match self.api.search(term, platform).await {
            Ok(results) => {
                debug!("Search '{}' returned {} games", term, results.len());
                self.state.send_modify(|state| {
                    state.search_results = results.clone();
                    state.is_searching = false;
                });
                results
            }
            Err(e) => {
                warn!("Search '{}' failed: {}", term, e);
                self.state.send_modify(|state| {
                    state.search_results.clear();
                    state.error = Some(e.to_string());
                    state.is_searching = false;
                });
                Vec::new()
            }
        }
    }

    /// Add `game` for `platform`
    ///
    /// Returns false when the pair is already in the library.
    pub async fn add_to_library(&self, game: &Game, platform: &str) -> Result<bool, StorageError> {
        let added = self.state.send_if_modified(|state| {
            let exists = state
                .user_library
                .iter()
                .any(|g| g.id == game.id && g.user_platform.as_deref() == Some(platform));
            if exists {
                return false;
            }

            let mut entry = game.clone();
            entry.user_platform = Some(platform.to_string());
            state.user_library.push(entry);
            true
        });

        if added {
            info!("Added {} ({}) on {}", game.name, game.id, platform);
            self.persist().await?;
        }
        Ok(added)
    }

    /// Remove library entries of a game
    ///
    /// With a platform only that copy goes; without one every copy and the
    /// favorite go. Returns the number of removed library entries.
    pub async fn remove_from_library(
        &self,
        game_id: i64,
        platform: Option<&str>,
    ) -> Result<usize, StorageError> {
        let mut removed = 0;
        let changed = self.state.send_if_modified(|state| {
            let before = state.user_library.len();
            let favorites = state.favorites.len();

            match platform {
                Some(platform) => state
                    .user_library
                    .retain(|g| !(g.id == game_id && g.user_platform.as_deref() == Some(platform))),
                None => {
                    state.user_library.retain(|g| g.id != game_id);
                    state.favorites.retain(|g| g.id != game_id);
                }
            }

            removed = before - state.user_library.len();
            removed > 0 || favorites != state.favorites.len()
        });

        if changed {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Returns false when the game is already a favorite
    pub async fn add_to_favorites(&self, game: &Game) -> Result<bool, StorageError> {
        let added = self.state.send_if_modified(|state| {
            if state.favorites.iter().any(|g| g.id == game.id) {
                return false;
            }
            state.favorites.push(game.clone());
            true
        });

        if added {
            self.persist().await?;
        }
        Ok(added)
    }

    pub async fn remove_from_favorites(&self, game_id: i64) -> Result<bool, StorageError> {
        let removed = self.state.send_if_modified(|state| {
            let before = state.favorites.len();
            state.favorites.retain(|g| g.id != game_id);
            before != state.favorites.len()
        });

        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    pub fn clear_search_results(&self) {
        self.state.send_modify(|state| state.search_results.clear());
    }

    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.state.send_modify(|state| state.error = Some(error));
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    /// Library entries grouped by owned platform, in first-seen order
    pub fn library_by_platform(&self) -> Vec<(String, Vec<Game>)> {
        let state = self.state.borrow();
        let mut groups: Vec<(String, Vec<Game>)> = Vec::new();

        for game in &state.user_library {
            let platform = game.user_platform.as_deref().unwrap_or("Unknown");
            match groups.iter_mut().find(|(name, _)| name == platform) {
                Some((_, games)) => games.push(game.clone()),
                None => groups.push((platform.to_string(), vec![game.clone()])),
            }
        }
        groups
    }

    /// Library entries matching a filter and a case-insensitive name query
    pub fn filtered_library(&self, filter: LibraryFilter, query: &str) -> Vec<Game> {
        let state = self.state.borrow();
        let query = query.trim().to_lowercase();

        let base: Vec<&Game> = match filter {
            LibraryFilter::All => state.user_library.iter().collect(),
            LibraryFilter::Favorites => state
                .user_library
                .iter()
                .filter(|g| state.favorites.iter().any(|f| f.id == g.id))
                .collect(),
            LibraryFilter::RecentlyAdded => state
                .user_library
                .iter()
                .rev()
                .take(RECENTLY_ADDED_LIMIT)
                .collect(),
        };

        base.into_iter()
            .filter(|g| query.is_empty() || g.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Look a game up in the library, then in the search results
    pub fn find_game(&self, game_id: i64) -> Option<Game> {
        let state = self.state.borrow();
        state
            .user_library
            .iter()
            .chain(state.search_results.iter())
            .find(|g| g.id == game_id)
            .cloned()
    }

    pub fn is_in_library(&self, game_id: i64) -> bool {
        self.state.borrow().user_library.iter().any(|g| g.id == game_id)
    }

    async fn persist(&self) -> Result<(), StorageError> {
        // Serialized so an older snapshot can never overwrite a newer one
        let _guard = self.persist_lock.lock().await;

        let snapshot = {
            let state = self.state.borrow();
            PersistedGames {
                user_library: state.user_library.clone(),
                favorites: state.favorites.clone(),
            }
        };
        save_snapshot(self.storage.as_ref(), GAME_STORE_KEY, &snapshot).await
    }
}
