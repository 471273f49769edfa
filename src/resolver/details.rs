use crate::{FetchError, FetchOutcome};
use serde_json::Value;
use std::collections::HashMap;

/// Outcomes of every reference URL resolved during one traversal
///
/// Each URL appears at most once. Failed fetches are kept as `Err` so a
/// missing entry always means "never discovered".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsMap {
    entries: HashMap<String, FetchOutcome>,
}

impl DetailsMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the successfully fetched payload for a URL
    pub fn get(&self, url: &str) -> Option<&Value> {
        self.entries.get(url).and_then(|outcome| outcome.as_ref().ok())
    }

    /// Returns the failure recorded for a URL, if the fetch failed
    pub fn failure(&self, url: &str) -> Option<&FetchError> {
        self.entries.get(url).and_then(|outcome| outcome.as_ref().err())
    }

    /// Returns true if the URL was resolved, successfully or not
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of resolved URLs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no URL was resolved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of URLs whose fetch failed
    pub fn failure_count(&self) -> usize {
        self.entries.values().filter(|outcome| outcome.is_err()).count()
    }

    /// Returns the string field `field` of the payload fetched from `url`
    pub fn field_str(&self, url: &str, field: &str) -> Option<&str> {
        self.get(url)
            .and_then(|payload| crate::json::lookup_str(payload, field))
    }

    /// Records an outcome; the first write for a URL wins
    pub(crate) fn record(&mut self, url: String, outcome: FetchOutcome) -> bool {
        use std::collections::hash_map::Entry;

        match self.entries.entry(url) {
            Entry::Vacant(slot) => {
                slot.insert(outcome);
                true
            }
            Entry::Occupied(_) => false,
        }
    }
}

impl FromIterator<(String, FetchOutcome)> for DetailsMap {
    fn from_iter<I: IntoIterator<Item = (String, FetchOutcome)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (url, outcome) in iter {
            map.record(url, outcome);
        }
        map
    }
}
