//! Durable checkpoint of run progress
//!
//! The checkpoint is a single JSON document rewritten in full on every
//! flush. Writes go to a sibling temp file which is synced and then renamed
//! over the previous checkpoint, so a crash mid-write leaves the last
//! complete checkpoint in place.

use crate::state::ProgressState;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to access checkpoint {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Checkpoint {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves `ProgressState` at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted progress
    ///
    /// A missing checkpoint is an empty state. A checkpoint that exists but
    /// cannot be parsed is an error; progress is never silently discarded.
    pub fn load(&self) -> Result<ProgressState, CheckpointError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProgressState::default());
            }
            Err(source) => {
                return Err(CheckpointError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| CheckpointError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replaces the checkpoint with `state`
    ///
    /// Stamps `last_updated` before writing.
    pub fn save(&self, state: &mut ProgressState) -> Result<(), CheckpointError> {
        state.touch();
        let encoded = serde_json::to_vec_pretty(state)?;

        let io_error = |source| CheckpointError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(io_error)?;
        file.write_all(&encoded).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        fs::rename(&temp_path, &self.path).map_err(io_error)?;

        tracing::debug!(
            "Checkpoint saved: {} processed, {} failed",
            state.processed_count(),
            state.failure_count()
        );
        Ok(())
    }
}
