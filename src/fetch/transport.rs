//! Raw HTTP transport
//!
//! This module performs exactly one GET per call and classifies the result:
//! - Building the pooled HTTP client
//! - Status and network error classification
//! - JSON body decoding

use crate::config::FetchConfig;
use crate::FetchError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Failure of a single request attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Server answered with a non-2xx status
    Status(u16),

    /// Connection refused, timeout, or body read failure
    Network(String),

    /// Body was received but is not valid JSON
    Decode(String),
}

impl AttemptError {
    /// Returns the HTTP status, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }

    /// Converts the attempt failure into the error reported for `url`
    ///
    /// Decode failures become [`FetchError::Decode`], which is not transient;
    /// everything else is a [`FetchError::Transport`] after `attempts` tries.
    pub fn into_fetch_error(self, url: &str, attempts: u32) -> FetchError {
        match self {
            Self::Decode(message) => FetchError::Decode {
                url: url.to_string(),
                message,
            },
            other => FetchError::Transport {
                url: url.to_string(),
                attempts,
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Network(message) | Self::Decode(message) => f.write_str(message),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The idle pool is sized to the concurrency limit so every permit holder
/// can reuse a warm connection.
///
/// # Example
///
/// ```no_run
/// use charweave::config::FetchConfig;
/// use charweave::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(config.concurrency_limit as usize)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends one GET request and decodes the body as JSON
///
/// # Returns
///
/// * `Ok(Value)` - The decoded body
/// * `Err(AttemptError)` - What went wrong with this attempt
pub async fn get_json(client: &Client, url: &str) -> Result<Value, AttemptError> {
    let response = client.get(url).send().await.map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AttemptError::Status(status.as_u16()));
    }

    let body = response.bytes().await.map_err(classify_error)?;
    serde_json::from_slice(&body).map_err(|e| AttemptError::Decode(e.to_string()))
}

fn classify_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::Network("Request timeout".to_string())
    } else if e.is_connect() {
        AttemptError::Network("Connection refused".to_string())
    } else {
        AttemptError::Network(e.to_string())
    }
}
