use crate::output::traits::{OutputError, OutputResult};
use crate::state::FailureRecord;
use std::path::Path;

pub const FAILURE_HEADERS: [&str; 3] = ["url", "error", "timestamp"];

/// Rewrites the failures file with the full failure history
///
/// The file is overwritten, never appended, so resumed runs do not
/// accumulate duplicates. Nothing is written when there are no failures.
/// Returns whether the file was written.
pub fn write_failures(path: &Path, failures: &[FailureRecord]) -> OutputResult<bool> {
    if failures.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FAILURE_HEADERS)?;
    for failure in failures {
        writer.write_record([&failure.url, &failure.error, &failure.timestamp])?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} failures to {}", failures.len(), path.display());
    Ok(true)
}
