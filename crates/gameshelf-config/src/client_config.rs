//! Client-side settings: backend location, fetch policy, local storage

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings used by the client stores and the resilient fetch helper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend game API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries after a server error before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds, multiplied by the attempt number
    #[serde(default = "default_backoff_ms")]
    pub backoff_unit_ms: u64,

    /// Directory holding persisted store snapshots
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_api_url() -> String {
    "http://localhost:3000/api/games".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1_000
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".gameshelf")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_unit_ms: default_backoff_ms(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}
