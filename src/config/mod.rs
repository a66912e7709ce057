//! Configuration module for the live-show crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the values the
//! upstream mobile client sends.
//!
//! # Example
//!
//! ```no_run
//! use yylive_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Concurrent requests: {}", config.crawler.max_concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ChannelsConfig, Config, CrawlerConfig, DeviceConfig, EndpointsConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
