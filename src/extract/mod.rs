//! Field extraction
//!
//! This module turns detail-page documents into `Record`s:
//! - `waterfall`: ordered strategy evaluation for scalar, list and link fields
//! - `strategies`: the locator tables per semantic field
//! - `patterns`: regex fallbacks over full page text
//! - `extractor`: the per-page pipeline

mod extractor;
pub mod patterns;
mod record;
pub mod strategies;
mod text;
pub mod waterfall;

pub use extractor::RecordExtractor;
pub use record::{Record, CSV_HEADERS, LIST_DELIMITER, RAW_SNAPSHOT_MAX};
pub use text::{normalize_non_empty, normalize_text, page_text, truncate_chars};
