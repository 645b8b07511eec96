//! Library entry types

use gameshelf_catalog::CatalogItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ownership status of a library entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    #[default]
    Owned,
    Wishlist,
    Played,
    Completed,
}

impl EntryStatus {
    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Owned => "OWNED",
            EntryStatus::Wishlist => "WISHLIST",
            EntryStatus::Played => "PLAYED",
            EntryStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNED" => Ok(EntryStatus::Owned),
            "WISHLIST" => Ok(EntryStatus::Wishlist),
            "PLAYED" => Ok(EntryStatus::Played),
            "COMPLETED" => Ok(EntryStatus::Completed),
            other => Err(format!("unknown entry status: {}", other)),
        }
    }
}

/// Body of an add-to-library request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub game_id: i64,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub status: Option<EntryStatus>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AddEntryRequest {
    pub fn new(game_id: i64) -> Self {
        Self {
            game_id,
            platform: None,
            status: None,
            rating: None,
            notes: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Row to be inserted into `game_entries`
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub id: String,
    pub user_id: String,
    pub game_id: i64,
    pub platform: Option<String>,
    pub status: EntryStatus,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: String,
}

/// A user's library entry joined with its cached game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub user_id: String,
    pub game_id: i64,
    pub platform: Option<String>,
    pub status: EntryStatus,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    /// RFC 3339
    pub created_at: String,
    pub game: CatalogItem,
}
