//! Charweave main entry point
//!
//! This is the command-line interface for the Charweave roster aggregator.

use anyhow::Context;
use charweave::aggregate::run;
use charweave::config::{apply_env_overrides, load_config_with_hash, validate, Config};
use charweave::output::print_summary;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Charweave: a character roster aggregator
///
/// Charweave pages through several public character APIs, resolves the
/// reference URLs embedded in their records, merges characters sharing a
/// name and writes the sorted roster to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "charweave")]
#[command(version)]
#[command(about = "A character roster aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write the roster to this path instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,

    /// Also resolve references found inside resolved payloads
    #[arg(long)]
    recursive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())
        .context("Invalid environment override")?;

    if let Some(path) = &cli.output {
        config.output.path = path.display().to_string();
    }
    if cli.recursive {
        config.resolver.recursive = true;
    }

    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("charweave=info,warn"),
            1 => EnvFilter::new("charweave=debug,info"),
            2 => EnvFilter::new("charweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) {
    println!("=== Charweave Dry Run ===\n");

    println!("Fetch Configuration:");
    println!("  Concurrency limit: {}", config.fetch.concurrency_limit);
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Backoff: {}ms x 2^n, clamped to {}..{}ms",
        config.fetch.backoff_multiplier_ms, config.fetch.backoff_min_ms, config.fetch.backoff_max_ms
    );
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  Cache capacity: {}", config.fetch.cache_capacity);
    println!("  Failure policy: {}", config.fetch.failure_policy);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nResolver:");
    println!("  Recursive: {}", config.resolver.recursive);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);

    let sources = config.effective_sources();
    println!("\nSources ({}):", sources.len());
    for entry in &sources {
        match &entry.url {
            Some(url) => println!("  - {:?} ({})", entry.kind, url),
            None => println!("  - {:?} (default entry point)", entry.kind),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Runs the aggregation, writes the roster and prints the summary
async fn handle_run(config: Config, quiet: bool) -> anyhow::Result<()> {
    let summary = run(&config).await.context("Aggregation run failed")?;

    if !quiet {
        print_summary(&summary);
    }

    Ok(())
}
