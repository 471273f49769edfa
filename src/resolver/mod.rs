//! Reference graph resolution
//!
//! This module walks arbitrary JSON values, finds string values that are
//! fetchable URLs, and fetches each of them exactly once per traversal:
//! - Arrays and objects fan out concurrently and join before returning
//! - Object keys are never treated as references
//! - A shared visited set, claimed with a single test-and-set, makes
//!   duplicate discovery and reference cycles harmless
//! - Failed fetches are recorded and never cancel sibling branches

mod details;

pub use details::DetailsMap;

use crate::fetch::FetchClient;
use crate::url::is_fetchable;
use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Resolves reference URLs embedded in JSON values
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use charweave::config::FetchConfig;
/// use charweave::fetch::FetchClient;
/// use charweave::resolver::GraphResolver;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(FetchClient::new(&FetchConfig::default())?);
/// let resolver = GraphResolver::new(client);
///
/// let luke = json!({"name": "Luke Skywalker", "species": ["https://swapi.dev/api/species/1/"]});
/// let details = resolver.resolve(&luke).await;
/// println!("{:?}", details.field_str("https://swapi.dev/api/species/1/", "name"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphResolver {
    client: Arc<FetchClient>,
    recursive: bool,
}

impl GraphResolver {
    /// Creates a non-recursive resolver
    pub fn new(client: Arc<FetchClient>) -> Self {
        Self {
            client,
            recursive: false,
        }
    }

    /// Enables or disables following URLs found inside fetched payloads
    ///
    /// Recursive resolution has no depth limit and can fetch a very large
    /// part of an API, so it is off unless asked for.
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    /// Returns true if fetched payloads are traversed too
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Resolves every reference reachable from `root`
    ///
    /// The visited set and the returned map belong to this call only; the
    /// client's response cache still spans calls.
    pub async fn resolve(&self, root: &Value) -> DetailsMap {
        let traversal = Traversal::new(&self.client, self.recursive);
        traversal.visit(root).await;
        let details = traversal.into_details();

        tracing::debug!(
            "Resolved {} reference(s), {} failed (recursive: {})",
            details.len(),
            details.failure_count(),
            self.recursive
        );
        details
    }
}

/// Resolves references in `root` with a one-off resolver
pub async fn resolve_references(
    client: Arc<FetchClient>,
    root: &Value,
    recursive: bool,
) -> DetailsMap {
    GraphResolver::new(client).recursive(recursive).resolve(root).await
}

/// Shared state of one traversal
struct Traversal<'c> {
    client: &'c FetchClient,
    recursive: bool,
    visited: Mutex<HashSet<String>>,
    details: Mutex<DetailsMap>,
}

impl<'c> Traversal<'c> {
    fn new(client: &'c FetchClient, recursive: bool) -> Self {
        Self {
            client,
            recursive,
            visited: Mutex::new(HashSet::new()),
            details: Mutex::new(DetailsMap::new()),
        }
    }

    /// Marks a URL as dispatched; only the first caller gets `true`
    fn claim(&self, url: &str) -> bool {
        lock(&self.visited).insert(url.to_string())
    }

    fn visit<'a>(&'a self, node: &'a Value) -> BoxFuture<'a, ()> {
        async move {
            match node {
                Value::String(candidate) => self.visit_reference(candidate).await,
                Value::Array(items) => {
                    join_all(items.iter().map(|item| self.visit(item))).await;
                }
                Value::Object(fields) => {
                    join_all(fields.values().map(|value| self.visit(value))).await;
                }
                Value::Null | Value::Bool(_) | Value::Number(_) => {}
            }
        }
        .boxed()
    }

    async fn visit_reference(&self, candidate: &str) {
        if !is_fetchable(candidate) || !self.claim(candidate) {
            return;
        }

        let outcome = self.client.fetch(candidate).await;
        match &outcome {
            Ok(payload) if self.recursive => self.visit(payload).await,
            Ok(_) => {}
            Err(e) => tracing::debug!("Reference {} left unresolved: {}", candidate, e),
        }

        lock(&self.details).record(candidate.to_string(), outcome);
    }

    fn into_details(self) -> DetailsMap {
        self.details
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
