//! Multi-source aggregation
//!
//! Runs every adapter's fetch and normalize pipeline concurrently, drops the
//! adapters that fail, and merges the surviving records by exact name. Merge
//! order follows adapter order, so the first adapter to produce a name decides
//! its origin.

mod merge;

pub use merge::{merge_into, merge_species, CharacterMap};

use crate::config::{validate, Config};
use crate::fetch::FetchClient;
use crate::output::{JsonFileSink, OutputSink, RunSummary};
use crate::record::{Character, Origin};
use crate::sources::{build_sources, SourceAdapter};
use futures::future::join_all;
use std::sync::Arc;

/// Result of one adapter's pipeline within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// Adapter name
    pub name: String,

    /// Franchise of the adapter
    pub origin: Origin,

    /// Raw items collected across all pages
    pub items: usize,

    /// Records produced by normalization
    pub records: usize,

    /// Failure message if the adapter was dropped
    pub error: Option<String>,
}

impl SourceReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of an aggregation run
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Merged records, sorted by case-folded name
    pub characters: Vec<Character>,

    /// One entry per adapter, in adapter order
    pub sources: Vec<SourceReport>,
}

impl AggregateReport {
    /// Number of adapters that failed
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| !s.succeeded()).count()
    }
}

/// Combines the records of several sources into one roster
pub struct Aggregator {
    sources: Vec<Box<dyn SourceAdapter>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { sources }
    }

    /// Names of the configured adapters
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Runs every adapter and returns the merged, sorted records
    ///
    /// Failing adapters are logged and left out; if every adapter fails the
    /// result is empty.
    pub async fn aggregate(&self) -> Vec<Character> {
        self.aggregate_with_report().await.characters
    }

    /// Same as [`aggregate`](Self::aggregate), also reporting per-adapter results
    pub async fn aggregate_with_report(&self) -> AggregateReport {
        let outcomes = join_all(self.sources.iter().map(|s| run_pipeline(s.as_ref()))).await;

        let mut map = CharacterMap::new();
        let mut reports = Vec::with_capacity(outcomes.len());

        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let mut report = SourceReport {
                name: source.name().to_string(),
                origin: source.origin(),
                items: 0,
                records: 0,
                error: None,
            };

            match outcome {
                Ok((items, characters)) => {
                    report.items = items;
                    report.records = characters.len();
                    map.extend(characters);
                }
                Err(message) => {
                    tracing::warn!("Source {} dropped: {}", source.name(), message);
                    report.error = Some(message);
                }
            }

            reports.push(report);
        }

        let characters = map.into_sorted();
        tracing::info!(
            "Aggregated {} characters from {} source(s)",
            characters.len(),
            reports.iter().filter(|r| r.succeeded()).count()
        );

        AggregateReport {
            characters,
            sources: reports,
        }
    }
}

/// Fetches and normalizes one source, returning raw item count and records
async fn run_pipeline(source: &dyn SourceAdapter) -> Result<(usize, Vec<Character>), String> {
    let raw = source.fetch_data().await.map_err(|e| e.to_string())?;
    tracing::debug!(
        "{}: {} items over {} page(s), {} resolved references",
        source.name(),
        raw.items.len(),
        raw.pages,
        raw.details.len()
    );

    let characters = source.normalize_data(&raw).map_err(|e| e.to_string())?;
    Ok((raw.items.len(), characters))
}

/// Runs a full aggregation from configuration
///
/// Validates the configuration, builds one shared fetch client and the
/// configured adapters, aggregates, and writes the roster to
/// `config.output.path`.
///
/// # Returns
///
/// * `Ok(RunSummary)` - The roster was written
/// * `Err(WeaveError)` - Invalid configuration, HTTP client setup failure,
///   or the output could not be written
pub async fn run(config: &Config) -> crate::Result<RunSummary> {
    validate(config)?;

    let client = Arc::new(FetchClient::new(&config.fetch)?);
    let aggregator = Aggregator::new(build_sources(config, Arc::clone(&client)));

    tracing::info!("Aggregating from: {}", aggregator.source_names().join(", "));
    let report = aggregator.aggregate_with_report().await;

    JsonFileSink::new(&config.output.path).save(&report.characters)?;

    Ok(RunSummary::new(&report, &client).with_output_path(config.output.path.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Collection;
    use crate::config::{SourceEntry, SourceKind};
    use crate::{ConfigError, WeaveError};
    use tempfile::TempDir;
    use async_trait::async_trait;
    use serde_json::json;

    /// In-memory adapter returning fixed records
    struct StaticSource {
        name: &'static str,
        origin: Origin,
        records: Vec<Character>,
        fail: bool,
    }

    impl StaticSource {
        fn new(name: &'static str, origin: Origin, records: Vec<Character>) -> Self {
            Self {
                name,
                origin,
                records,
                fail: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                origin: Origin::StarWars,
                records: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SourceAdapter for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn origin(&self) -> Origin {
            self.origin
        }

        async fn fetch_data(&self) -> crate::Result<Collection> {
            if self.fail {
                return Err(WeaveError::Source {
                    source_name: self.name.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(Collection::from_items(
                self.records.iter().map(|c| json!({"name": c.name})).collect(),
            ))
        }

        fn normalize_data(&self, _raw: &Collection) -> crate::Result<Vec<Character>> {
            Ok(self.records.clone())
        }
    }

    #[tokio::test]
    async fn test_luke_skywalker_across_sources() {
        let first = StaticSource::new(
            "first",
            Origin::StarWars,
            vec![Character::new("Luke Skywalker", Origin::StarWars, "Human")
                .with_attribute("birth_year", "19BBY")],
        );
        let second = StaticSource::new(
            "second",
            Origin::StarWars,
            vec![Character::new("Luke Skywalker", Origin::StarWars, "Jedi")
                .with_attribute("height", "172")],
        );

        let characters = Aggregator::new(vec![Box::new(first), Box::new(second)])
            .aggregate()
            .await;

        assert_eq!(characters.len(), 1);
        let luke = &characters[0];
        assert_eq!(luke.name, "Luke Skywalker");
        assert_eq!(luke.species, "Human, Jedi");
        assert_eq!(luke.additional_attributes["birth_year"], json!("19BBY"));
        assert_eq!(luke.additional_attributes["height"], json!("172"));
    }

    #[tokio::test]
    async fn test_first_adapter_decides_origin() {
        let pokemon = StaticSource::new(
            "pokemon",
            Origin::Pokemon,
            vec![Character::new("Abra", Origin::Pokemon, "psychic")],
        );
        let other = StaticSource::new(
            "other",
            Origin::RickAndMorty,
            vec![Character::new("Abra", Origin::RickAndMorty, "Alien")],
        );

        let characters = Aggregator::new(vec![Box::new(pokemon), Box::new(other)])
            .aggregate()
            .await;

        assert_eq!(characters[0].origin, Origin::Pokemon);
        assert_eq!(characters[0].species, "psychic, Alien");
    }

    #[tokio::test]
    async fn test_failing_source_is_dropped() {
        let good = StaticSource::new(
            "good",
            Origin::RickAndMorty,
            vec![
                Character::new("Morty Smith", Origin::RickAndMorty, "Human"),
                Character::new("Birdperson", Origin::RickAndMorty, "Bird-Person"),
            ],
        );

        let report = Aggregator::new(vec![Box::new(StaticSource::failing("bad")), Box::new(good)])
            .aggregate_with_report()
            .await;

        let names: Vec<&str> = report.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Birdperson", "Morty Smith"]);
        assert_eq!(report.failed_sources(), 1);
        assert!(report.sources[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("connection refused")));
        assert_eq!(report.sources[1].items, 2);
        assert_eq!(report.sources[1].records, 2);
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty() {
        let aggregator = Aggregator::new(vec![
            Box::new(StaticSource::failing("a")),
            Box::new(StaticSource::failing("b")),
        ]);

        assert!(aggregator.aggregate().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_sources() {
        let report = Aggregator::new(Vec::new()).aggregate_with_report().await;
        assert!(report.characters.is_empty());
        assert!(report.sources.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_names_are_not_merged() {
        let source = StaticSource::new(
            "mock",
            Origin::StarWars,
            vec![
                Character::new("R2-D2", Origin::StarWars, "Droid"),
                Character::new("r2-d2", Origin::StarWars, "Droid"),
            ],
        );

        let characters = Aggregator::new(vec![Box::new(source)]).aggregate().await;
        assert_eq!(characters.len(), 2);
    }

    fn offline_config(output_path: &str) -> Config {
        let mut config = Config {
            sources: vec![SourceEntry {
                kind: SourceKind::Swapi,
                url: Some("http://127.0.0.1:9/people/".to_string()),
            }],
            ..Config::default()
        };
        config.output.path = output_path.to_string();
        config
    }

    #[tokio::test]
    async fn test_run_rejects_blank_output_path() {
        let result = run(&offline_config("")).await;

        assert!(matches!(
            result,
            Err(WeaveError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_reports_unwritable_output() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let output = blocker.join("characters.json");

        let mut config = offline_config(output.to_str().unwrap());
        config.fetch.max_attempts = 1;

        let result = run(&config).await;
        assert!(matches!(result, Err(WeaveError::Output(_))));
    }
}
