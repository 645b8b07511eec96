//! Game metadata client for Gameshelf
//!
//! Talks to the IGDB catalog: acquires a Twitch client-credentials token,
//! posts IGDB query-language requests and maps the response into
//! [`CatalogItem`] records.

mod igdb;
mod item;
mod query;
mod token;

pub use igdb::IgdbClient;
pub use item::CatalogItem;
pub use query::{GAME_FIELDS, by_id_query, search_query};
pub use token::TokenState;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to authenticate with IGDB: {0}")]
    Authentication(String),

    #[error("Failed to search games: {0}")]
    SearchFailed(String),

    #[error("Catalog returned status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of catalog metadata
///
/// `search` reports failures to the caller; `fetch_by_id` treats every
/// failure as "absent" and only logs it.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the catalog, optionally restricted to platforms whose name
    /// ends with `platform`
    async fn search(
        &self,
        term: &str,
        platform: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Look a single game up by its catalog id
    async fn fetch_by_id(&self, id: i64) -> Option<CatalogItem>;
}
