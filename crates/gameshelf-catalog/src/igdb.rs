//! IGDB HTTP client

use crate::item::IgdbGame;
use crate::query::{by_id_query, search_query};
use crate::token::TokenState;
use crate::{CatalogError, CatalogItem, CatalogSource};
use async_trait::async_trait;
use gameshelf_config::CatalogConfig;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds
    expires_in: u64,
}

/// Catalog client backed by the IGDB v4 API
pub struct IgdbClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    api_url: String,
    search_limit: u32,
    refresh_margin: Duration,
    token: Mutex<TokenState>,
}

impl IgdbClient {
    /// Create a new client from catalog settings
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(format!("Gameshelf/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            refresh_margin: config.refresh_margin(),
            token: Mutex::new(TokenState::Unset),
        })
    }

    /// Current bearer token, requesting a new one when none is usable
    ///
    /// The lock is held across the refresh so concurrent callers wait for
    /// one token request instead of issuing their own.
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut state = self.token.lock().await;
        if let Some(token) = state.current(Instant::now()) {
            return Ok(token.to_string());
        }

        let grant = self.request_token().await.map_err(|e| {
            error!("Failed to get IGDB access token: {}", e);
            CatalogError::Authentication(e.to_string())
        })?;

        info!("Obtained IGDB access token (expires in {}s)", grant.expires_in);
        let token = grant.access_token.clone();
        state.store(
            grant.access_token,
            Duration::from_secs(grant.expires_in),
            self.refresh_margin,
            Instant::now(),
        );

        Ok(token)
    }

    async fn request_token(&self) -> Result<TokenResponse, CatalogError> {
        debug!("Requesting token from {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .json(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: "client_credentials",
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Post a query to an IGDB endpoint
    async fn query(&self, endpoint: &str, query: String) -> Result<Vec<IgdbGame>, CatalogError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}", self.api_url, endpoint);

        debug!("Posting IGDB query to {}: {}", url, query);

        let response = self
            .client
            .post(&url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogSource for IgdbClient {
    async fn search(
        &self,
        term: &str,
        platform: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let query = search_query(term, platform, self.search_limit);

        match self.query("games", query).await {
            Ok(games) => Ok(games.into_iter().map(CatalogItem::from).collect()),
            Err(e @ CatalogError::Authentication(_)) => Err(e),
            Err(e) => {
                error!("IGDB search error for {:?}: {}", term, e);
                Err(CatalogError::SearchFailed(e.to_string()))
            }
        }
    }

    async fn fetch_by_id(&self, id: i64) -> Option<CatalogItem> {
        match self.query("games", by_id_query(id)).await {
            Ok(games) => games.into_iter().next().map(CatalogItem::from),
            Err(e) => {
                error!("IGDB get game error for {}: {}", id, e);
                None
            }
        }
    }
}
