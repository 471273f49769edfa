//! Character source adapters
//!
//! Each adapter knows one public API: where its listing starts, how its pages
//! link to each other, and how its fields map onto [`Character`]. The
//! aggregator only ever sees the [`SourceAdapter`] trait, so adding a source
//! means adding an implementation here and a [`SourceKind`] variant.

mod pokeapi;
mod rick_and_morty;
mod swapi;

pub use pokeapi::PokeApiSource;
pub use rick_and_morty::RickAndMortySource;
pub use swapi::SwapiSource;

use crate::collector::{Collection, PaginatedCollector};
use crate::config::{Config, SourceEntry, SourceKind};
use crate::fetch::FetchClient;
use crate::record::{Character, Origin};
use crate::WeaveError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// One external character API
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short name used in logs and run reports
    fn name(&self) -> &str;

    /// Franchise of the records this source produces
    fn origin(&self) -> Origin;

    /// Fetches every raw item and resolves the references inside them
    async fn fetch_data(&self) -> crate::Result<Collection>;

    /// Maps raw items onto canonical records
    ///
    /// May read `raw.details` to turn reference URLs into readable values.
    fn normalize_data(&self, raw: &Collection) -> crate::Result<Vec<Character>>;
}

/// Pagination layout of a listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Dot path of the item array
    pub items_path: &'static str,

    /// Dot path of the next-page URL
    pub next_path: &'static str,
}

/// Shared plumbing for sources backed by a paginated listing
#[derive(Debug, Clone)]
pub(crate) struct Listing {
    name: &'static str,
    url: String,
    layout: PageLayout,
    collector: PaginatedCollector,
}

impl Listing {
    pub(crate) fn new(
        name: &'static str,
        url: String,
        layout: PageLayout,
        collector: PaginatedCollector,
    ) -> Self {
        Self {
            name,
            url,
            layout,
            collector,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) async fn fetch(&self) -> crate::Result<Collection> {
        tracing::info!("Fetching {} from {}", self.name, self.url);
        self.collector
            .collect(&self.url, self.layout.items_path, self.layout.next_path)
            .await
            .map_err(|e| WeaveError::Source {
                source_name: self.name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Drops repeated names within one source, keeping the first occurrence
#[derive(Debug, Default)]
pub(crate) struct SeenNames {
    names: HashSet<String>,
}

impl SeenNames {
    /// Returns true the first time a name is offered
    pub(crate) fn first_time(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }
}

/// Reads the `name` field of a raw item, logging items without one
pub(crate) fn item_name<'a>(source: &str, item: &'a Value) -> Option<&'a str> {
    let name = item.get("name").and_then(Value::as_str);
    if name.is_none() {
        tracing::debug!("{} item without a name skipped", source);
    }
    name
}

/// Reads a string field, substituting a default when absent
pub(crate) fn str_or<'a>(item: &'a Value, field: &str, default: &'a str) -> &'a str {
    item.get(field).and_then(Value::as_str).unwrap_or(default)
}

/// Builds one adapter per configured source, sharing a single fetch client
pub fn build_sources(config: &Config, client: Arc<FetchClient>) -> Vec<Box<dyn SourceAdapter>> {
    config
        .effective_sources()
        .iter()
        .map(|entry| build_source(entry, Arc::clone(&client), config.resolver.recursive))
        .collect()
}

/// Builds the adapter for one source entry
pub fn build_source(
    entry: &SourceEntry,
    client: Arc<FetchClient>,
    recursive: bool,
) -> Box<dyn SourceAdapter> {
    let collector = PaginatedCollector::new(client).recursive(recursive);
    let url = entry.url.clone();

    match entry.kind {
        SourceKind::Swapi => Box::new(SwapiSource::new(url, collector)),
        SourceKind::Pokeapi => Box::new(PokeApiSource::new(url, collector)),
        SourceKind::RickAndMorty => Box::new(RickAndMortySource::new(url, collector)),
    }
}
