use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that overrides the output path
const OUTPUT_PATH_ENV: &str = "FILE_NAME";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are not applied here; see [`apply_env_overrides`].
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use charweave::config::load_config;
///
/// let config = load_config(Path::new("charweave.toml")).unwrap();
/// println!("Concurrency: {}", config.fetch.concurrency_limit);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the same settings.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies environment overrides to a configuration
///
/// `SWAPI_API`, `POKE_API` and `RICK_AND_MORTY_API` replace the entry point
/// of the matching source; `FILE_NAME` replaces the output path. Empty
/// values are ignored. The result is validated again.
///
/// # Arguments
///
/// * `config` - The configuration to modify
/// * `lookup` - Variable lookup, usually `|key| std::env::var(key).ok()`
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let mut sources = config.effective_sources();
    let mut touched = false;
    for entry in &mut sources {
        if let Some(url) = lookup(entry.kind.env_var()) {
            tracing::debug!("{} overrides {:?} entry point", entry.kind.env_var(), entry.kind);
            entry.url = Some(url);
            touched = true;
        }
    }
    if touched {
        config.sources = sources;
    }

    if let Some(path) = lookup(OUTPUT_PATH_ENV) {
        config.output.path = path;
    }

    validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use crate::fetch::FailurePolicy;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[fetch]
concurrency-limit = 50
max-attempts = 3
backoff-multiplier-ms = 500
backoff-min-ms = 100
backoff-max-ms = 4000
cache-capacity = 1024
request-timeout-secs = 5
failure-policy = "degrade"
user-agent = "TestAgent/1.0"

[resolver]
recursive = true

[output]
path = "./roster.json"

[[source]]
kind = "swapi"
url = "https://swapi.example.com/api/people/"

[[source]]
kind = "rick-and-morty"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetch.concurrency_limit, 50);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.cache_capacity, 1024);
        assert_eq!(config.fetch.failure_policy, FailurePolicy::Degrade);
        assert_eq!(config.fetch.user_agent, "TestAgent/1.0");
        assert!(config.resolver.recursive);
        assert_eq!(config.output.path, "./roster.json");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].kind, SourceKind::Swapi);
        assert_eq!(
            config.sources[0].url.as_deref(),
            Some("https://swapi.example.com/api/people/")
        );
        assert_eq!(config.sources[1].kind, SourceKind::RickAndMorty);
        assert_eq!(config.sources[1].url, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.fetch.concurrency_limit, 20);
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.backoff_multiplier_ms, 1_000);
        assert_eq!(config.fetch.backoff_min_ms, 2_000);
        assert_eq!(config.fetch.backoff_max_ms, 10_000);
        assert_eq!(config.fetch.cache_capacity, 65_536);
        assert_eq!(config.fetch.failure_policy, FailurePolicy::Propagate);
        assert!(!config.resolver.recursive);
        assert_eq!(config.output.path, "characters.json");
        assert!(config.sources.is_empty());
        assert_eq!(config.effective_sources().len(), 3);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/charweave.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_source_kind_is_rejected() {
        let result = parse_config("[[source]]\nkind = \"marvel\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[fetch]
concurrency-limit = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_env_overrides_source_url_and_output() {
        let vars: HashMap<&str, &str> = [
            ("POKE_API", "http://localhost:9000/pokemon"),
            ("FILE_NAME", "out.json"),
            ("SWAPI_API", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.output.path, "out.json");
        assert_eq!(config.sources.len(), 3);
        let poke = config
            .sources
            .iter()
            .find(|s| s.kind == SourceKind::Pokeapi)
            .unwrap();
        assert_eq!(poke.url.as_deref(), Some("http://localhost:9000/pokemon"));
        let swapi = config
            .sources
            .iter()
            .find(|s| s.kind == SourceKind::Swapi)
            .unwrap();
        assert_eq!(swapi.url, None);
    }

    #[test]
    fn test_env_override_without_matches_keeps_sources_implicit() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |_| None).unwrap();
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_env_override_is_validated() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, |key| {
            (key == "SWAPI_API").then(|| "not-a-url".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }
}
