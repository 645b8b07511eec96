//! Catalog provider (IGDB) settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Credentials and endpoints for the metadata provider
#[derive(Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Twitch application client id
    #[serde(default)]
    pub client_id: String,

    /// Twitch application client secret
    #[serde(default)]
    pub client_secret: String,

    /// OAuth client-credentials endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Base URL of the catalog API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Maximum results per search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Seconds subtracted from the token lifetime before it is refreshed
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_api_url() -> String {
    "https://api.igdb.com/v4".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_refresh_margin() -> u64 {
    60
}

fn default_timeout() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: default_token_url(),
            api_url: default_api_url(),
            search_limit: default_search_limit(),
            refresh_margin_secs: default_refresh_margin(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl CatalogConfig {
    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// The secret must never end up in logs
impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("search_limit", &self.search_limit)
            .field("refresh_margin_secs", &self.refresh_margin_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
