//! Configuration module for Charweave
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the environment overrides inherited from earlier deployments.
//!
//! # Example
//!
//! ```no_run
//! use charweave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("charweave.toml")).unwrap();
//! println!("Fetching with {} permits", config.fetch.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, OutputConfig, ResolverConfig, SourceEntry, SourceKind};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
