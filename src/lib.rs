//! Charweave: a character roster aggregator
//!
//! This crate pulls character records from several paginated REST APIs,
//! resolves the reference URLs embedded in their JSON, and merges records
//! sharing a name into one canonical, sorted roster.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod fetch;
pub mod json;
pub mod output;
pub mod record;
pub mod resolver;
pub mod sources;
pub mod url;

use thiserror::Error;

/// Main error type for Charweave operations
#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Source {source_name} failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure of a single URL fetch
///
/// Outcomes are stored in resolution maps and handed between tasks, so the
/// variants carry rendered messages rather than the underlying client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("URL is not fetchable: {url}")]
    NotFetchable { url: String },

    #[error("Request to {url} failed after {attempts} attempt(s): {message}")]
    Transport {
        url: String,
        attempts: u32,
        status: Option<u16>,
        message: String,
    },

    #[error("Response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("Empty response from {url}")]
    EmptyResponse { url: String },
}

impl FetchError {
    /// Returns the URL this failure belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::NotFetchable { url }
            | Self::Transport { url, .. }
            | Self::Decode { url, .. }
            | Self::EmptyResponse { url } => url,
        }
    }

    /// Returns true if another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Result type alias for Charweave operations
pub type Result<T> = std::result::Result<T, WeaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Outcome of fetching one URL
pub type FetchOutcome = std::result::Result<serde_json::Value, FetchError>;

// Re-export commonly used types
pub use aggregate::Aggregator;
pub use collector::{Collection, PaginatedCollector};
pub use config::Config;
pub use fetch::{FailurePolicy, FetchClient, RetryPolicy};
pub use record::{Character, Origin};
pub use resolver::{DetailsMap, GraphResolver};
pub use sources::SourceAdapter;
