//! Integration tests for the aggregation pipeline
//!
//! These tests point the real source adapters at wiremock servers and run
//! the full fetch, resolve, merge and write cycle end-to-end.

use charweave::aggregate::Aggregator;
use charweave::config::{Config, FetchConfig, OutputConfig, ResolverConfig, SourceEntry, SourceKind};
use charweave::fetch::FetchClient;
use charweave::output::{JsonFileSink, OutputSink, RunSummary};
use charweave::record::{Character, Origin};
use charweave::sources::build_sources;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast retries and the given sources
fn create_test_config(sources: Vec<(SourceKind, String)>, output_path: &str) -> Config {
    Config {
        fetch: FetchConfig {
            concurrency_limit: 4,
            max_attempts: 2,
            backoff_multiplier_ms: 1,
            backoff_min_ms: 1,
            backoff_max_ms: 5,
            request_timeout_secs: 5,
            ..FetchConfig::default()
        },
        resolver: ResolverConfig { recursive: false },
        output: OutputConfig {
            path: output_path.to_string(),
        },
        sources: sources
            .into_iter()
            .map(|(kind, url)| SourceEntry {
                kind,
                url: Some(url),
            })
            .collect(),
    }
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_aggregation_with_failing_source() {
    let server = MockServer::start().await;
    let base = server.uri();

    // SWAPI: two pages, species behind a reference URL shared by both pages
    mount_json(
        &server,
        "/swapi/people/",
        json!({
            "next": format!("{base}/swapi/people/page-2"),
            "results": [
                {"name": "Luke Skywalker", "birth_year": "19BBY", "species": [format!("{base}/swapi/species/1/")]},
                {"name": "R2-D2", "birth_year": "33BBY", "species": [format!("{base}/swapi/species/2/")]}
            ]
        }),
    )
    .await;
    mount_json(
        &server,
        "/swapi/people/page-2",
        json!({
            "next": null,
            "results": [
                {"name": "Leia Organa", "birth_year": "19BBY", "species": [format!("{base}/swapi/species/1/")]}
            ]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/swapi/species/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Human"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/swapi/species/2/", json!({"name": "Droid"})).await;

    // Rick and Morty: pagination under info.next
    mount_json(
        &server,
        "/rm/character",
        json!({
            "info": {"count": 2, "next": format!("{base}/rm/character/page-2")},
            "results": [{"name": "Luke Skywalker", "species": "Jedi", "status": "Alive"}]
        }),
    )
    .await;
    mount_json(
        &server,
        "/rm/character/page-2",
        json!({
            "info": {"count": 2, "next": null},
            "results": [{"name": "Rick Sanchez", "species": "Human", "status": "Alive"}]
        }),
    )
    .await;

    // PokéAPI: always down, retried once
    Mock::given(method("GET"))
        .and(path("/poke/pokemon"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("characters.json");
    let config = create_test_config(
        vec![
            (SourceKind::Swapi, format!("{base}/swapi/people/")),
            (SourceKind::Pokeapi, format!("{base}/poke/pokemon")),
            (SourceKind::RickAndMorty, format!("{base}/rm/character")),
        ],
        output_path.to_str().unwrap(),
    );

    let client = Arc::new(FetchClient::new(&config.fetch).unwrap());
    let aggregator = Aggregator::new(build_sources(&config, Arc::clone(&client)));
    let report = aggregator.aggregate_with_report().await;

    let names: Vec<&str> = report.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Leia Organa", "Luke Skywalker", "R2-D2", "Rick Sanchez"]);

    let luke = &report.characters[1];
    assert_eq!(luke.origin, Origin::StarWars);
    assert_eq!(luke.species, "Human, Jedi");
    assert_eq!(luke.additional_attributes["birth_year"], json!("19BBY"));
    assert_eq!(luke.additional_attributes["status"], json!("Alive"));
    assert_eq!(report.characters[2].species, "Droid");
    assert_eq!(report.characters[3].origin, Origin::RickAndMorty);

    assert_eq!(report.sources.len(), 3);
    assert_eq!(report.sources[0].items, 3);
    assert!(report.sources[1].error.is_some());
    assert_eq!(report.sources[2].records, 2);

    let summary = RunSummary::new(&report, &client);
    assert_eq!(summary.failed_sources(), 1);
    assert_eq!(summary.records_before_merge(), 5);

    JsonFileSink::new(&output_path)
        .save(&report.characters)
        .unwrap();
    let written: Vec<Character> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written, report.characters);
}

#[tokio::test]
async fn test_pokemon_details_resolved() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_json(
        &server,
        "/api/v2/pokemon",
        json!({
            "next": null,
            "results": [
                {"name": "bulbasaur", "url": format!("{base}/api/v2/pokemon/1/")},
                {"name": "pikachu", "url": format!("{base}/api/v2/pokemon/25/")}
            ]
        }),
    )
    .await;
    mount_json(
        &server,
        "/api/v2/pokemon/1/",
        json!({
            "base_experience": 64,
            "types": [{"type": {"name": "grass"}}, {"type": {"name": "poison"}}],
            "sprites": {"front_default": format!("{base}/sprites/1.png")}
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/25/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sprites/1.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(
        vec![(SourceKind::Pokeapi, format!("{base}/api/v2/pokemon"))],
        dir.path().join("out.json").to_str().unwrap(),
    );
    config.resolver.recursive = true;

    let client = Arc::new(FetchClient::new(&config.fetch).unwrap());
    let characters = Aggregator::new(build_sources(&config, client)).aggregate().await;

    assert_eq!(characters.len(), 2);
    assert_eq!(characters[0].name, "Bulbasaur");
    assert_eq!(characters[0].species, "grass, poison");
    assert_eq!(characters[0].additional_attributes["base_experience"], json!(64));

    // Failed detail fetch only degrades its own record
    assert_eq!(characters[1].name, "Pikachu");
    assert_eq!(characters[1].species, "Unknown");
    assert_eq!(characters[1].additional_attributes["base_experience"], json!(0));
}

#[tokio::test]
async fn test_every_source_failing_yields_empty_roster() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(
        vec![
            (SourceKind::Swapi, format!("{base}/people/")),
            (SourceKind::RickAndMorty, format!("{base}/character")),
        ],
        "unused.json",
    );

    let client = Arc::new(FetchClient::new(&config.fetch).unwrap());
    let report = Aggregator::new(build_sources(&config, client))
        .aggregate_with_report()
        .await;

    assert!(report.characters.is_empty());
    assert_eq!(report.failed_sources(), 2);
}

#[tokio::test]
async fn test_run_writes_roster_and_summary() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_json(
        &server,
        "/character",
        json!({
            "info": {"next": null},
            "results": [
                {"name": "Summer Smith", "species": "Human", "status": "Alive"},
                {"name": "Birdperson", "species": "Bird-Person", "status": "Dead"}
            ]
        }),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("roster").join("characters.json");
    let config = create_test_config(
        vec![(SourceKind::RickAndMorty, format!("{base}/character"))],
        output_path.to_str().unwrap(),
    );

    let summary = charweave::aggregate::run(&config).await.unwrap();

    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.failed_sources(), 0);
    assert_eq!(summary.requests_sent, 1);
    assert_eq!(summary.output_path.as_deref(), output_path.to_str());

    let written: Vec<Character> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let names: Vec<&str> = written.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Birdperson", "Summer Smith"]);
}
