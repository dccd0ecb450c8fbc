//! Configuration module for Folio
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use folio::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("folio.toml")).unwrap();
//! println!("Waiting {}ms between requests", config.crawler.delay_ms);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    default_link_patterns, Config, CrawlerConfig, DiscoveryConfig, ExtractionConfig,
    OutputConfig, OutputFormat, TargetEntry, UserAgentConfig, DEFAULT_IDENTITY,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
