//! Backend search API

use crate::FetchError;
use crate::fetch::ResilientFetch;
use crate::game_store::Game;
use async_trait::async_trait;
use gameshelf_config::ClientConfig;
use reqwest::Url;
use tracing::debug;

/// Remote game search used by the game store
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, term: &str, platform: Option<&str>) -> Result<Vec<Game>, FetchError>;
}

/// Search through the backend's `/search` endpoint
pub struct RemoteSearchApi {
    base_url: String,
    fetch: ResilientFetch,
}

impl RemoteSearchApi {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            fetch: ResilientFetch::new(config)?,
        })
    }

    /// Search URL with properly encoded query parameters
    pub fn search_url(&self, term: &str, platform: Option<&str>) -> Result<Url, FetchError> {
        let mut params = vec![("q", term)];
        if let Some(platform) = platform.filter(|p| !p.is_empty()) {
            params.push(("platform", platform));
        }

        Url::parse_with_params(&format!("{}/search", self.base_url), &params)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl SearchApi for RemoteSearchApi {
    async fn search(&self, term: &str, platform: Option<&str>) -> Result<Vec<Game>, FetchError> {
        let url = self.search_url(term, platform)?;
        debug!("Searching backend: {}", url);

        self.fetch
            .get(url.as_str())
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string())))
            .collect()
    }
}
