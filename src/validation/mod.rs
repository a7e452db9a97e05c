//! Structural validation of extracted records
//!
//! Field resolution is best effort, so every record passes through this gate
//! before it reaches the primary output. Invalid records are counted but
//! never written.

use crate::extract::{normalize_text, Record, RAW_SNAPSHOT_MAX};
use thiserror::Error;
use url::Url;

/// A single schema rule a record breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("name is missing or blank")]
    MissingName,

    #[error("source tag {found:?} does not match {expected:?}")]
    WrongSource { expected: String, found: String },

    #[error("{field} is not an absolute http(s) URL: {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("scraped_at is not an RFC 3339 timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("raw_text_snapshot has {0} characters")]
    SnapshotTooLong(usize),

    #[error("{field} is present but blank")]
    BlankScalar { field: &'static str },

    #[error("{field} contains a blank entry")]
    BlankListEntry { field: &'static str },
}

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(Record),
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Checks a record against the output schema
///
/// # Arguments
///
/// * `record` - The candidate record
/// * `expected_source` - The source tag every record of this run carries
pub fn validate_record(record: Record, expected_source: &str) -> ValidationResult {
    let violations = violations(&record, expected_source);

    if violations.is_empty() {
        ValidationResult::Valid(record)
    } else {
        ValidationResult::Invalid(violations)
    }
}

/// Collects every violation of `record`; empty when the record is valid
pub fn violations(record: &Record, expected_source: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if record
        .name
        .as_deref()
        .map_or(true, |name| normalize_text(name).is_empty())
    {
        violations.push(Violation::MissingName);
    }

    if record.source != expected_source {
        violations.push(Violation::WrongSource {
            expected: expected_source.to_string(),
            found: record.source.clone(),
        });
    }

    for (field, value) in [
        ("listing_page_url", &record.listing_page_url),
        ("profile_url", &record.profile_url),
    ] {
        if !is_absolute_http(value) {
            violations.push(Violation::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if chrono::DateTime::parse_from_rfc3339(&record.scraped_at).is_err() {
        violations.push(Violation::InvalidTimestamp(record.scraped_at.clone()));
    }

    if let Some(snapshot) = &record.raw_text_snapshot {
        let length = snapshot.chars().count();
        if length > RAW_SNAPSHOT_MAX {
            violations.push(Violation::SnapshotTooLong(length));
        }
    }

    // name is covered above
    for (field, value) in record.scalars().into_iter().skip(1) {
        if value.is_some_and(|v| normalize_text(v).is_empty()) {
            violations.push(Violation::BlankScalar { field });
        }
    }

    for (field, values) in record.lists() {
        if values.iter().any(|v| normalize_text(v).is_empty()) {
            violations.push(Violation::BlankListEntry { field });
        }
    }

    violations
}

fn is_absolute_http(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
