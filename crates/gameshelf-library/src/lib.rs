//! Game library service for Gameshelf
//!
//! Keeps a per-user library of catalog games in SQLite. Catalog metadata is
//! cached locally in the `games` table and refreshed on every add; library
//! entries join a user, a cached game and the platform the user owns it on.

mod database;
mod entry;
mod service;

pub use database::LibraryDatabase;
pub use entry::{AddEntryRequest, EntryStatus, LibraryEntry, NewEntry};
pub use service::LibraryService;

use gameshelf_catalog::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Game not found: {0}")]
    GameNotFound(i64),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
