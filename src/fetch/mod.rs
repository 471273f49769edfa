//! Fetch module for reference and page retrieval
//!
//! This module contains the bounded fetch primitive, including:
//! - Pooled HTTP transport with JSON decoding
//! - Global in-flight request limiting via a semaphore
//! - LRU memoization of successful responses
//! - Retry with exponential backoff for transient failures

mod cache;
mod client;
mod retry;
mod transport;

pub use cache::ResponseCache;
pub use client::FetchClient;
pub use retry::RetryPolicy;
pub use transport::{build_http_client, get_json, AttemptError};

use serde::Deserialize;

/// What a fetch yields once every attempt has failed
///
/// `Propagate` hands the typed error to the caller so dependent work such as
/// pagination can stop. `Degrade` returns an empty JSON object so callers
/// carry on with partial data; such results are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    Propagate,
    Degrade,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Propagate => f.write_str("propagate"),
            Self::Degrade => f.write_str("degrade"),
        }
    }
}
