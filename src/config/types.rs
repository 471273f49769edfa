use crate::fetch::FailurePolicy;
use serde::Deserialize;

/// Main configuration structure for Charweave
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

impl Config {
    /// Returns the configured sources, or every built-in source if none are listed
    pub fn effective_sources(&self) -> Vec<SourceEntry> {
        if self.sources.is_empty() {
            SourceKind::ALL
                .iter()
                .map(|kind| SourceEntry {
                    kind: *kind,
                    url: None,
                })
                .collect()
        } else {
            self.sources.clone()
        }
    }
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of requests in flight at once
    #[serde(rename = "concurrency-limit")]
    pub concurrency_limit: u32,

    /// Total attempts per URL, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff multiplier (milliseconds)
    #[serde(rename = "backoff-multiplier-ms")]
    pub backoff_multiplier_ms: u64,

    /// Lower bound for a single backoff sleep (milliseconds)
    #[serde(rename = "backoff-min-ms")]
    pub backoff_min_ms: u64,

    /// Upper bound for a single backoff sleep (milliseconds)
    #[serde(rename = "backoff-max-ms")]
    pub backoff_max_ms: u64,

    /// Number of successful responses kept in memory
    #[serde(rename = "cache-capacity")]
    pub cache_capacity: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// What a fetch returns once retries are exhausted
    #[serde(rename = "failure-policy")]
    pub failure_policy: FailurePolicy,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 20,
            max_attempts: 5,
            backoff_multiplier_ms: 1_000,
            backoff_min_ms: 2_000,
            backoff_max_ms: 10_000,
            cache_capacity: 65_536,
            request_timeout_secs: 30,
            failure_policy: FailurePolicy::Propagate,
            user_agent: format!("charweave/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Reference resolution configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Follow URLs found inside fetched reference payloads
    pub recursive: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON file the merged roster is written to
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "characters.json".to_string(),
        }
    }
}

/// One configured character source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceEntry {
    /// Which built-in adapter to use
    pub kind: SourceKind,

    /// Entry point override (defaults to the public API)
    #[serde(default)]
    pub url: Option<String>,
}

/// Built-in source adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Swapi,
    Pokeapi,
    RickAndMorty,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::Pokeapi, Self::Swapi, Self::RickAndMorty];

    /// Environment variable that overrides this source's entry point
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Swapi => "SWAPI_API",
            Self::Pokeapi => "POKE_API",
            Self::RickAndMorty => "RICK_AND_MORTY_API",
        }
    }
}
