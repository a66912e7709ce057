//! Record sinks
//!
//! A sink receives each page's records as one batch. Concurrent pagination
//! chains share a sink, so every batch lands as one contiguous write.

use crate::crawler::Record;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// UTF-8 byte-order mark written at the start of every result file
pub const BOM: &str = "\u{feff}";

/// Destination for extracted records
///
/// Implementations must be safe under concurrent writers.
pub trait RecordSink: Send + Sync {
    /// Appends one page's records as a single write
    ///
    /// # Returns
    ///
    /// The number of records actually written
    fn append_batch(&self, records: &[Record]) -> OutputResult<usize>;
}

/// Key identifying a live show within a run
type RecordKey = (String, String, String);

fn record_key(record: &Record) -> RecordKey {
    (
        record.channel.clone(),
        record.live_id.clone(),
        record.sid.clone(),
    )
}

/// Renders a batch as newline-terminated lines
fn render_batch<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    let mut batch = String::new();
    for record in records {
        batch.push_str(&record.to_line());
        batch.push('\n');
    }
    batch
}

struct FileSinkState {
    file: File,
    seen: Option<HashSet<RecordKey>>,
}

/// Appends records to the run's dated result file
pub struct FileSink {
    path: PathBuf,
    state: Mutex<FileSinkState>,
}

impl FileSink {
    /// Creates `<directory>/<prefix>.<date>.csv`, truncating any earlier file
    /// for the same date, and writes the byte-order mark
    ///
    /// # Arguments
    ///
    /// * `directory` - Output directory, created if missing
    /// * `prefix` - File name prefix
    /// * `date` - Run date used in the file name
    /// * `deduplicate` - Drop records already written during this run
    pub fn create(
        directory: &Path,
        prefix: &str,
        date: NaiveDate,
        deduplicate: bool,
    ) -> OutputResult<Self> {
        fs::create_dir_all(directory)?;
        let path = directory.join(result_file_name(prefix, date));

        fs::write(&path, BOM)?;
        let file = OpenOptions::new().append(true).open(&path)?;

        Ok(Self {
            path,
            state: Mutex::new(FileSinkState {
                file,
                seen: deduplicate.then(HashSet::new),
            }),
        })
    }

    /// Path of the result file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FileSink {
    fn append_batch(&self, records: &[Record]) -> OutputResult<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| OutputError::Write("result file lock poisoned".to_string()))?;

        let batch: Vec<&Record> = match state.seen.as_mut() {
            Some(seen) => records
                .iter()
                .filter(|record| seen.insert(record_key(record)))
                .collect(),
            None => records.iter().collect(),
        };

        if batch.is_empty() {
            return Ok(0);
        }

        state.file.write_all(render_batch(batch.iter().copied()).as_bytes())?;
        state.file.flush()?;
        Ok(batch.len())
    }
}

/// Result file name for a run date, e.g. `yylive.2024-05-01.csv`
pub fn result_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}.{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Keeps batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<Record>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches received so far, in arrival order
    pub fn batches(&self) -> Vec<Vec<Record>> {
        self.batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }

    /// All records received so far, flattened
    pub fn records(&self) -> Vec<Record> {
        self.batches().into_iter().flatten().collect()
    }

    /// All records rendered the way [`FileSink`] writes them, without the BOM
    pub fn contents(&self) -> String {
        render_batch(&self.records())
    }
}

impl RecordSink for MemorySink {
    fn append_batch(&self, records: &[Record]) -> OutputResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut batches = self
            .batches
            .lock()
            .map_err(|_| OutputError::Write("memory sink lock poisoned".to_string()))?;
        batches.push(records.to_vec());
        Ok(records.len())
    }
}
