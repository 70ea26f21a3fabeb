//! Configuration module for Poem-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags override the values loaded here.
//!
//! # Example
//!
//! ```no_run
//! use poem_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetching {} poems at a time", config.harvester.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvesterConfig, SelectorConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
