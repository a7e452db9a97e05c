//! Run progress and its durable checkpoint
//!
//! # Components
//!
//! - `ProgressState`: processed URLs and the failure audit trail
//! - `CheckpointStore`: atomic load/save of `ProgressState`
//! - `UnitOutcome`: how a single unit of work ended

mod checkpoint;
mod outcome;
mod progress;

pub use checkpoint::{CheckpointError, CheckpointStore};
pub use outcome::{CompletedUnit, UnitOutcome};
pub use progress::{FailureRecord, ProgressState};
