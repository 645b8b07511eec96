//! GET requests with a timeout and retries on server errors

use crate::FetchError;
use gameshelf_config::ClientConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// What to do with a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Retryable,
    Fatal,
}

impl FetchOutcome {
    /// Classify an HTTP status
    ///
    /// 2xx succeeds, 5xx may be retried and everything else (4xx, unfollowed
    /// redirects) fails immediately.
    pub fn classify(status: u16) -> Self {
        match status {
            200..=299 => FetchOutcome::Success,
            500..=599 => FetchOutcome::Retryable,
            _ => FetchOutcome::Fatal,
        }
    }
}

/// HTTP GET helper used for backend calls
pub struct ResilientFetch {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
    backoff_unit: Duration,
}

impl ResilientFetch {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let timeout = config.request_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gameshelf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("Network error: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            max_retries: config.max_retries,
            backoff_unit: config.backoff_unit(),
        })
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }

    /// Fetch `url` and return its JSON array payload
    ///
    /// Server errors are retried up to `max_retries` times with a linearly
    /// growing delay. A payload that is not an array yields an empty list.
    pub async fn get(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        let mut attempt = 0;

        loop {
            debug!("GET {} (attempt {})", url, attempt + 1);

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            let status = response.status().as_u16();

            match FetchOutcome::classify(status) {
                FetchOutcome::Success => return self.read_array(response).await,
                FetchOutcome::Fatal => {
                    return Err(FetchError::Api {
                        status,
                        retryable: false,
                    });
                }
                FetchOutcome::Retryable => {
                    if attempt >= self.max_retries {
                        return Err(FetchError::Api {
                            status,
                            retryable: true,
                        });
                    }
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        "Server error {} from {}, retry {}/{} in {:?}",
                        status, url, attempt, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn read_array(&self, response: reqwest::Response) -> Result<Vec<Value>, FetchError> {
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        match payload {
            Value::Array(items) => Ok(items),
            other => {
                warn!("Expected a JSON array, got {}", kind_of(&other));
                Ok(Vec::new())
            }
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(format!("Network error: {}", err))
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
