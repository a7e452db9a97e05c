//! Output module for harvested records and run reports
//!
//! This module handles:
//! - Appending validated records to JSONL and CSV files
//! - Rewriting the failures file at the end of a run
//! - Saving raw page snapshots for debugging
//! - Reporting the run summary on the console and as markdown

mod debug;
mod failures;
mod markdown;
mod sinks;
pub mod stats;
mod traits;

pub use debug::{save_debug_html, LISTING_ERROR_SLUG};
pub use failures::{write_failures, FAILURE_HEADERS};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use sinks::{CsvSink, JsonlSink, OutputSinks};
pub use stats::{print_progress_status, print_summary};
pub use traits::{OutputError, OutputResult, RecordSink, RunSummary};
