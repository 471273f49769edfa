//! Paginated collection
//!
//! This module follows a source's "next page" chain, concatenates the item
//! arrays of every page, and enriches the items with their reference URLs.
//!
//! Unlike reference resolution, pagination is all-or-nothing: a page that
//! cannot be fetched means the next link is unknown, so the whole collection
//! fails.

use crate::fetch::FetchClient;
use crate::json::{is_empty_payload, lookup, lookup_str};
use crate::resolver::{DetailsMap, GraphResolver};
use crate::FetchError;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Items gathered from one paginated source, with their resolved references
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Items of every page, in page order
    pub items: Vec<Value>,

    /// Outcomes of the reference URLs found inside `items`
    pub details: DetailsMap,

    /// Number of pages fetched
    pub pages: usize,
}

impl Collection {
    /// Builds a collection from items alone, without network access
    pub fn from_items(items: Vec<Value>) -> Self {
        Self {
            items,
            details: DetailsMap::new(),
            pages: 0,
        }
    }

    /// Attaches resolved references
    pub fn with_details(mut self, details: DetailsMap) -> Self {
        self.details = details;
        self
    }
}

/// Walks a paginated endpoint
#[derive(Debug, Clone)]
pub struct PaginatedCollector {
    client: Arc<FetchClient>,
    resolver: GraphResolver,
}

impl PaginatedCollector {
    /// Creates a collector whose reference pass is non-recursive
    pub fn new(client: Arc<FetchClient>) -> Self {
        let resolver = GraphResolver::new(Arc::clone(&client));
        Self { client, resolver }
    }

    /// Sets whether the reference pass follows URLs inside fetched payloads
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.resolver = self.resolver.recursive(enabled);
        self
    }

    /// Collects every page starting at `start_url`
    ///
    /// # Arguments
    ///
    /// * `start_url` - First page
    /// * `items_path` - Dot path of the item array in each page (e.g. `results`)
    /// * `next_path` - Dot path of the next-page URL (e.g. `next`, `info.next`)
    ///
    /// # Returns
    ///
    /// * `Ok(Collection)` - All items in page order plus their references
    /// * `Err(FetchError)` - A page failed to load or came back empty
    pub async fn collect(
        &self,
        start_url: &str,
        items_path: &str,
        next_path: &str,
    ) -> Result<Collection, FetchError> {
        let mut items = Vec::new();
        let mut seen_pages = HashSet::new();
        let mut next_url = Some(start_url.to_string());

        while let Some(url) = next_url.take() {
            if !seen_pages.insert(url.clone()) {
                tracing::warn!("Pagination loops back to {}, stopping", url);
                break;
            }

            let page = self.client.fetch(&url).await?;
            if is_empty_payload(&page) {
                return Err(FetchError::EmptyResponse { url });
            }

            match lookup(&page, items_path) {
                Some(Value::Array(page_items)) => items.extend(page_items.iter().cloned()),
                Some(other) => {
                    tracing::debug!("{} holds {} at '{}', expected an array", url, kind(other), items_path)
                }
                None => tracing::debug!("{} has no items at '{}'", url, items_path),
            }

            next_url = lookup_str(&page, next_path)
                .filter(|next| !next.is_empty())
                .map(str::to_string);
        }

        let pages = seen_pages.len();
        tracing::info!(
            "Collected {} item(s) from {} page(s) starting at {}",
            items.len(),
            pages,
            start_url
        );

        let root = Value::Array(items);
        let details = self.resolver.resolve(&root).await;
        let items = match root {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        Ok(Collection {
            items,
            details,
            pages,
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
