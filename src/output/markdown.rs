//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a harvest run,
//! including counts, failures, and the artifacts the run produced.

use crate::output::traits::{OutputError, OutputResult, RunSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Failures listed individually before the report truncates
const MAX_LISTED_FAILURES: usize = 20;

/// Writes the markdown report for a run
///
/// # Arguments
///
/// * `summary` - The run summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Profile Harvest Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {:.1} seconds ({:.2} minutes)\n",
            duration,
            duration / 60.0
        ));
    }
    let status = match &summary.aborted {
        Some(reason) => format!("aborted ({})", reason),
        None => "completed".to_string(),
    };
    md.push_str(&format!("- **Status**: {}\n", status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Counts
    md.push_str("## Results\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Discovered | {} |\n", summary.discovered));
    md.push_str(&format!(
        "| Skipped (already processed) | {} |\n",
        summary.skipped_processed
    ));
    md.push_str(&format!("| Scheduled | {} |\n", summary.scheduled));
    md.push_str(&format!("| Succeeded | {} |\n", summary.succeeded));
    md.push_str(&format!(
        "| Validation failed | {} |\n",
        summary.validation_failed
    ));
    md.push_str(&format!(
        "| Extraction failed | {} |\n\n",
        summary.extraction_failed
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    // Failures
    if !summary.failures.is_empty() {
        md.push_str("## Failed URLs\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");

        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {} |\n",
                failure.url,
                failure.error.replace('|', "\\|")
            ));
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    // Artifacts
    md.push_str("## Artifacts\n\n");
    for (label, path) in summary.artifacts() {
        md.push_str(&format!("- **{}**: `{}`\n", label, path.display()));
    }
    if summary.debug_snapshots > 0 {
        md.push_str(&format!(
            "\n{} debug snapshot(s) saved this run.\n",
            summary.debug_snapshots
        ));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FailureRecord;
    use std::path::PathBuf;

    fn create_test_summary() -> RunSummary {
        let mut summary = RunSummary::new();
        summary.started_at = "2024-01-01T00:00:00Z".to_string();
        summary.finished_at = Some("2024-01-01T01:00:00Z".to_string());
        summary.duration_seconds = Some(3600.0);
        summary.config_hash = "abc123".to_string();
        summary.discovered = 120;
        summary.skipped_processed = 20;
        summary.scheduled = 100;
        summary.succeeded = 90;
        summary.validation_failed = 4;
        summary.extraction_failed = 6;
        summary.records_jsonl = PathBuf::from("output/records.jsonl");
        summary.records_csv = PathBuf::from("output/records.csv");
        summary
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_summary());

        assert!(markdown.contains("# Profile Harvest Summary"));
        assert!(markdown.contains("Run Information"));
        assert!(markdown.contains("- **Status**: completed"));
        assert!(markdown.contains("| Discovered | 120 |"));
        assert!(markdown.contains("| Validation failed | 4 |"));
        assert!(markdown.contains("90.00%"));
        assert!(markdown.contains("`output/records.jsonl`"));
    }

    #[test]
    fn test_markdown_lists_failures() {
        let mut summary = create_test_summary();
        summary.failures = vec![FailureRecord::new(
            "https://x.io/doctor/a",
            "Request timeout for https://x.io/doctor/a",
        )];

        let markdown = format_markdown_summary(&summary);
        assert!(markdown.contains("## Failed URLs"));
        assert!(markdown.contains("| https://x.io/doctor/a | Request timeout"));
    }

    #[test]
    fn test_markdown_marks_aborted_run() {
        let mut summary = create_test_summary();
        summary.aborted = Some("listing page unreachable".to_string());

        let markdown = format_markdown_summary(&summary);
        assert!(markdown.contains("aborted (listing page unreachable)"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.md");

        generate_markdown_summary(&create_test_summary(), &path).unwrap();
        assert!(std::fs::read_to_string(path)
            .unwrap()
            .starts_with("# Profile Harvest Summary"));
    }

    #[test]
    fn test_generate_creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("2024").join("summary.md");

        generate_markdown_summary(&create_test_summary(), &path).unwrap();
        assert!(path.exists());
    }
}
