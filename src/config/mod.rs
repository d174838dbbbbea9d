//! Configuration module for Scope-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an empty file is a valid, unbounded crawl.
//!
//! # Example
//!
//! ```no_run
//! use scope_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will return at most {} pages", config.crawler.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, MatcherEntry, MatcherKind, NormalizerKind,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate_path_prefix, validate_seed};
