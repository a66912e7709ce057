//! Task engine - fetches tasks and feeds responses to the controller
//!
//! Tasks run concurrently on the tokio runtime, bounded by a semaphore.
//! Follow-up tasks returned by the controller are spawned as they arrive,
//! so each channel's chain advances independently of the others. The crawl
//! is finished when no task is left in flight.

use crate::config::CrawlerConfig;
use crate::crawler::controller::Controller;
use crate::crawler::fetcher::{build_http_client, fetch_task};
use crate::crawler::task::Task;
use crate::output::CrawlStatistics;
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct Engine {
    client: Client,
    controller: Arc<Controller>,
    semaphore: Arc<Semaphore>,
    request_delay: Duration,
}

impl Engine {
    /// Creates an engine driving `controller`
    pub fn new(config: &CrawlerConfig, controller: Arc<Controller>) -> Result<Self, CrawlError> {
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            controller,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests as usize)),
            request_delay: Duration::from_millis(config.request_delay),
        })
    }

    /// Runs the crawl from the seed task until no task is left
    pub async fn run(&self) -> CrawlStatistics {
        self.run_from(vec![self.controller.seed_task()]).await
    }

    /// Runs the crawl starting from the given tasks
    pub async fn run_from(&self, seeds: Vec<Task>) -> CrawlStatistics {
        let start_time = Instant::now();
        let mut in_flight: JoinSet<Vec<Task>> = JoinSet::new();
        let mut completed: u64 = 0;

        for task in seeds {
            self.spawn(&mut in_flight, task);
        }

        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(follow_ups) => {
                    for task in follow_ups {
                        self.spawn(&mut in_flight, task);
                    }
                }
                Err(e) => tracing::error!("Crawl task did not complete: {}", e),
            }

            completed += 1;
            if completed % 10 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} requests completed, {} in flight, {:.2} requests/sec",
                    completed,
                    in_flight.len(),
                    completed as f64 / elapsed.as_secs_f64()
                );
            }
        }

        tracing::info!("Task queue is empty, crawl complete");
        self.controller.counters().snapshot(start_time.elapsed())
    }

    fn spawn(&self, in_flight: &mut JoinSet<Vec<Task>>, task: Task) {
        let client = self.client.clone();
        let controller = Arc::clone(&self.controller);
        let semaphore = Arc::clone(&self.semaphore);
        let delay = self.request_delay;

        in_flight.spawn(async move {
            let body = {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return Vec::new(),
                };

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                tracing::debug!("Fetching {}", task);
                fetch_task(&client, &task).await
            };

            match body {
                Ok(body) => controller.dispatch(&task, &body),
                Err(e) => {
                    tracing::error!("{} fetch failed: {}", task, e);
                    controller.counters().fetch_failed();
                    Vec::new()
                }
            }
        });
    }
}
