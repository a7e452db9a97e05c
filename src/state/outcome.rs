//! Terminal outcomes of a single harvest unit

use crate::extract::Record;
use crate::validation::Violation;
use std::fmt;
use std::path::PathBuf;

/// How one unit of work ended
#[derive(Debug, Clone)]
pub enum UnitOutcome {
    /// Extracted and validated; the record goes to the output sinks
    Succeeded(Record),

    /// Extracted but structurally invalid; counted, never written or retried
    ValidationFailed(Vec<Violation>),

    /// Navigation failed on every attempt, or the unit could not run
    ExtractionFailed(String),
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Short label used in logs and the run summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded(_) => "succeeded",
            Self::ValidationFailed(_) => "validation_failed",
            Self::ExtractionFailed(_) => "extraction_failed",
        }
    }
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded(record) => {
                write!(f, "succeeded ({})", record.name.as_deref().unwrap_or("unnamed"))
            }
            Self::ValidationFailed(violations) => {
                let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "validation failed: {}", reasons.join(", "))
            }
            Self::ExtractionFailed(error) => write!(f, "extraction failed: {}", error),
        }
    }
}

/// A finished unit, reported back to the control loop
#[derive(Debug, Clone)]
pub struct CompletedUnit {
    pub url: String,
    pub outcome: UnitOutcome,
    pub attempts: u32,
    /// Raw page saved when the unit failed
    pub debug_snapshot: Option<PathBuf>,
}
