//! Library use-cases on top of the catalog and the database

use crate::database::LibraryDatabase;
use crate::entry::{AddEntryRequest, LibraryEntry, NewEntry};
use crate::LibraryError;
use chrono::{SecondsFormat, Utc};
use gameshelf_catalog::{CatalogItem, CatalogSource};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Per-user game library backed by a catalog source and SQLite
pub struct LibraryService {
    catalog: Arc<dyn CatalogSource>,
    db: Mutex<LibraryDatabase>,
}

impl LibraryService {
    pub fn new(catalog: Arc<dyn CatalogSource>, db: LibraryDatabase) -> Self {
        Self {
            catalog,
            db: Mutex::new(db),
        }
    }

    /// Search the catalog
    pub async fn search(
        &self,
        term: &str,
        platform: Option<&str>,
    ) -> Result<Vec<CatalogItem>, LibraryError> {
        Ok(self.catalog.search(term, platform).await?)
    }

    /// Add a catalog game to a user's library
    ///
    /// Refreshes the cached game and inserts the entry atomically. The
    /// status defaults to `OWNED`.
    pub async fn add_to_library(
        &self,
        user_id: &str,
        request: AddEntryRequest,
    ) -> Result<LibraryEntry, LibraryError> {
        let game = self
            .catalog
            .fetch_by_id(request.game_id)
            .await
            .ok_or(LibraryError::GameNotFound(request.game_id))?;

        let entry = NewEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            game_id: request.game_id,
            platform: request.platform,
            status: request.status.unwrap_or_default(),
            rating: request.rating,
            notes: request.notes,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let mut db = self.db.lock().await;
        let stored = db.record_entry(&game, &entry)?;

        info!(
            "Added {} ({}) to library of {} as {}",
            stored.game.name, stored.game_id, user_id, stored.status
        );
        Ok(stored)
    }

    /// All entries of a user, newest first
    pub async fn list_library(&self, user_id: &str) -> Result<Vec<LibraryEntry>, LibraryError> {
        let db = self.db.lock().await;
        db.entries_for_user(user_id)
    }

    /// Remove an entry owned by the user
    ///
    /// Entries of other users and unknown ids are left alone; the number of
    /// removed rows is returned.
    pub async fn remove_from_library(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<usize, LibraryError> {
        let db = self.db.lock().await;
        let removed = db.delete_entry(user_id, entry_id)?;
        debug!("Removed {} entries for {} ({})", removed, user_id, entry_id);
        Ok(removed)
    }
}
