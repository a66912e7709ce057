//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client from the engine configuration
//! - Issuing GET requests for tasks
//! - Classifying failures
//!
//! There is no retry: a failed fetch ends the branch it belongs to.

use crate::config::CrawlerConfig;
use crate::crawler::task::Task;
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use yylive_crawler::config::CrawlerConfig;
/// use yylive_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.clone());
    }

    builder.build()
}

/// Fetches a task's URL and returns the decoded body text
///
/// The body is decoded using the charset from the response's Content-Type,
/// falling back to UTF-8.
///
/// # Returns
///
/// * `Ok(String)` - Response body of a 2xx response
/// * `Err(CrawlError::Status)` - Non-success status code
/// * `Err(CrawlError::Http)` - Connection, timeout, or body read failure
pub async fn fetch_task(client: &Client, task: &Task) -> Result<String, CrawlError> {
    let url = task.url();

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })
}
