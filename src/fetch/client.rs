use crate::config::FetchConfig;
use crate::fetch::cache::ResponseCache;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::transport::{build_http_client, get_json};
use crate::fetch::FailurePolicy;
use crate::url::is_fetchable;
use crate::{FetchError, FetchOutcome};
use futures::future::join_all;
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Semaphore;

/// Concurrency-bounded, memoizing, retrying JSON fetcher
///
/// One client is shared by every source of an aggregation run, so the
/// permit pool is a global in-flight budget and the cache spans all sources.
///
/// Layers, outermost first:
/// 1. Fetchability filter (static assets are never requested)
/// 2. Response cache (a hit skips everything below)
/// 3. Retry loop with exponential backoff
/// 4. Permit acquisition around each physical request
/// 5. Raw transport
#[derive(Debug)]
pub struct FetchClient {
    http: Client,
    permits: Semaphore,
    concurrency_limit: usize,
    cache: ResponseCache,
    retry: RetryPolicy,
    failure_policy: FailurePolicy,
    requests_sent: AtomicU64,
    cache_hits: AtomicU64,
}

impl FetchClient {
    /// Creates a client from fetch configuration
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Ready to use
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let http = build_http_client(config)?;
        Ok(Self::with_http_client(http, config))
    }

    /// Creates a client around an existing reqwest client
    pub fn with_http_client(http: Client, config: &FetchConfig) -> Self {
        let concurrency_limit = config.concurrency_limit.max(1) as usize;
        Self {
            http,
            permits: Semaphore::new(concurrency_limit),
            concurrency_limit,
            cache: ResponseCache::new(config.cache_capacity),
            retry: RetryPolicy::from_config(config),
            failure_policy: config.failure_policy,
            requests_sent: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    /// Fetches a URL and decodes it as JSON
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The payload (from cache or network), or an empty
    ///   object when retries are exhausted under [`FailurePolicy::Degrade`]
    /// * `Err(FetchError::NotFetchable)` - Not an HTTP(S) URL, or a static asset
    /// * `Err(FetchError::Transport)` - Every attempt failed
    /// * `Err(FetchError::Decode)` - The body was not JSON
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        if !is_fetchable(url) {
            return Err(FetchError::NotFetchable {
                url: url.to_string(),
            });
        }

        if let Some(value) = self.cache.get(url) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Cache hit for {}", url);
            return Ok(value);
        }

        match self.fetch_with_retry(url).await {
            Ok(value) => {
                self.cache.insert(url.to_string(), value.clone());
                Ok(value)
            }
            Err(e) => match self.failure_policy {
                FailurePolicy::Propagate => Err(e),
                FailurePolicy::Degrade => {
                    tracing::warn!("Degrading failed fetch of {} to empty payload: {}", e.url(), e);
                    Ok(Value::Object(Map::new()))
                }
            },
        }
    }

    /// Fetches several URLs concurrently, preserving input order
    pub async fn fetch_many<S: AsRef<str>>(&self, urls: &[S]) -> Vec<FetchOutcome> {
        join_all(urls.iter().map(|url| self.fetch(url.as_ref()))).await
    }

    /// Retry loop around single attempts; the permit is held only while a
    /// request is on the wire, never during backoff
    async fn fetch_with_retry(&self, url: &str) -> FetchOutcome {
        let mut failures = 0;

        loop {
            let attempt = {
                let _permit = self.permits.acquire().await.map_err(|_| FetchError::Transport {
                    url: url.to_string(),
                    attempts: failures,
                    status: None,
                    message: "fetch client is shut down".to_string(),
                })?;
                self.requests_sent.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Fetching {}", url);
                get_json(&self.http, url).await
            };

            let attempt_error = match attempt {
                Ok(value) => {
                    if failures > 0 {
                        tracing::debug!("{} succeeded after {} retries", url, failures);
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            failures += 1;
            let error = attempt_error.into_fetch_error(url, failures);
            if !error.is_transient() || !self.retry.should_retry(failures) {
                tracing::warn!("Giving up: {}", error);
                return Err(error);
            }

            let delay = self.retry.delay_after(failures);
            tracing::warn!(
                "Attempt {}/{} failed, retrying in {:?}: {}",
                failures,
                self.retry.max_attempts,
                delay,
                error
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Number of physical requests sent, retries included
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Number of fetches answered from the cache
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Number of responses currently cached
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    /// Size of the permit pool
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Permits not currently held by an in-flight request
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// The active failure policy
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
