//! yylive-crawler: a live-show directory crawler
//!
//! This crate crawls a paginated channel directory, walks every channel's
//! live-show listing until it runs dry, and writes one comma-joined record
//! per live show to a dated output file.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Upstream payload errors
///
/// A payload that does not decode into the expected shape. Stages recover
/// from these locally by abandoning the affected branch.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for payload decoding
pub type PayloadResult<T> = std::result::Result<T, PayloadError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Channel, Controller, Record, Stage, Task};
pub use output::{FileSink, RecordSink};
