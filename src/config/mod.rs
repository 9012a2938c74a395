//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a built-in default carrying the constants the
//! harvester was originally tuned with, so a config file is optional.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Max reviews: {}", config.crawl.max_reviews);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Combination, Config, CrawlConfig, OutputConfig};

// Re-export parser functions
pub use parser::{default_config, load_config};
