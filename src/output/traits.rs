//! Output sink traits and types
//!
//! This module defines the trait interface for record sinks and the summary
//! reported at the end of a harvest run.

use crate::extract::Record;
use crate::state::FailureRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A durable, append-only destination for validated records
///
/// Each record is flushed as soon as it is written so that a crash loses
/// nothing already reported as written.
pub trait RecordSink: Send {
    /// Appends one record and flushes it
    fn write_record(&mut self, record: &Record) -> OutputResult<()>;

    /// The file this sink appends to
    fn path(&self) -> &Path;
}

/// Summary of a finished (or aborted) harvest run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<f64>,
    pub config_hash: String,
    pub aborted: Option<String>,

    // Counts
    pub discovered: usize,
    pub skipped_processed: usize,
    pub scheduled: usize,
    pub succeeded: usize,
    pub validation_failed: usize,
    pub extraction_failed: usize,
    pub debug_snapshots: usize,

    // Failure history from the checkpoint, earlier runs included
    pub failures: Vec<FailureRecord>,

    // Artifacts
    pub records_jsonl: PathBuf,
    pub records_csv: PathBuf,
    pub failures_csv: Option<PathBuf>,
    pub progress: PathBuf,
    pub debug_directory: PathBuf,
    pub summary: PathBuf,
}

impl RunSummary {
    /// Creates a new empty run summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Units that reached a terminal outcome this run
    pub fn completed(&self) -> usize {
        self.succeeded + self.validation_failed + self.extraction_failed
    }

    /// Returns the success rate as a percentage of completed units
    pub fn success_rate(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / completed as f64) * 100.0
    }

    /// Every artifact path with a label, in reporting order
    pub fn artifacts(&self) -> Vec<(&'static str, &Path)> {
        let mut artifacts = vec![
            ("Records (JSONL)", self.records_jsonl.as_path()),
            ("Records (CSV)", self.records_csv.as_path()),
        ];
        if let Some(failures) = &self.failures_csv {
            artifacts.push(("Failures", failures.as_path()));
        }
        artifacts.push(("Checkpoint", self.progress.as_path()));
        artifacts.push(("Debug snapshots", self.debug_directory.as_path()));
        artifacts.push(("Summary", self.summary.as_path()));
        artifacts
    }
}
