//! Logging capability handed to crawl stages
//!
//! Stages log through an [`EventLog`] they are given instead of a global
//! logger, so tests can observe what a stage reported.

use std::sync::Mutex;
use tracing::Level;

/// A sink for `(level, message, context)` log events
pub trait EventLog: Send + Sync {
    fn log(&self, level: Level, message: &str, context: &[(&str, String)]);

    fn info(&self, message: &str, context: &[(&str, String)]) {
        self.log(Level::INFO, message, context);
    }

    fn error(&self, message: &str, context: &[(&str, String)]) {
        self.log(Level::ERROR, message, context);
    }
}

/// Forwards events to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn log(&self, level: Level, message: &str, context: &[(&str, String)]) {
        let context = format_context(context);
        match level {
            Level::ERROR => tracing::error!(context = %context, "{}", message),
            Level::WARN => tracing::warn!(context = %context, "{}", message),
            Level::INFO => tracing::info!(context = %context, "{}", message),
            Level::DEBUG => tracing::debug!(context = %context, "{}", message),
            _ => tracing::trace!(context = %context, "{}", message),
        }
    }
}

fn format_context(context: &[(&str, String)]) -> String {
    context
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A captured log event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub context: Vec<(String, String)>,
}

impl LogEntry {
    /// Returns true if the message or any context value contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.context.iter().any(|(_, v)| v.contains(needle))
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events logged so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Events logged at `level`
    pub fn at_level(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }
}

impl EventLog for MemoryLog {
    fn log(&self, level: Level, message: &str, context: &[(&str, String)]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                message: message.to_string(),
                context: context
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
        }
    }
}
