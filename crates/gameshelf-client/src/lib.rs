//! Client-side state for Gameshelf
//!
//! Three persisted stores hold what the user sees:
//!
//! - [`GameStore`]: search results, the local game library and favorites
//! - [`UserStore`]: language, owned platforms and theme
//! - [`SearchStore`]: search history, selected platform and filters
//!
//! Each store publishes its state through a `tokio::sync::watch` channel and
//! writes snapshots through a [`StateStorage`] adapter. Searches go to the
//! backend through [`ResilientFetch`], which retries server errors.

pub mod api;
pub mod fetch;
pub mod game_store;
pub mod platforms;
pub mod search_store;
pub mod storage;
pub mod user_store;

pub use api::{RemoteSearchApi, SearchApi};
pub use fetch::{FetchOutcome, ResilientFetch};
pub use game_store::{Game, GameState, GameStore, LibraryFilter};
pub use platforms::{IgdbPlatform, PlatformManufacturer};
pub use search_store::{SearchFilters, SearchPreferences, SearchStore};
pub use storage::{FileStorage, MemoryStorage, StateStorage};
pub use user_store::{ThemeMode, UserSettings, UserStore};

use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the backend
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure; the message is shown to the user as is
    #[error("{0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error: {status}")]
    Api { status: u16, retryable: bool },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether repeating the request later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Api { retryable, .. } => *retryable,
            FetchError::Network(_) | FetchError::Timeout(_) => true,
            FetchError::Decode(_) | FetchError::InvalidUrl(_) => false,
        }
    }
}

/// Errors raised by persistence adapters
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Api {
            status: 503,
            retryable: true,
        };
        assert_eq!(err.to_string(), "API error: 503");
        assert!(err.is_retryable());

        let err = FetchError::Api {
            status: 404,
            retryable: false,
        };
        assert!(!err.is_retryable());

        assert_eq!(
            FetchError::Network("Network error".into()).to_string(),
            "Network error"
        );
    }
}
