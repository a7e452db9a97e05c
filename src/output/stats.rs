//! Console reporting of run results and checkpoint status

use crate::output::traits::RunSummary;
use crate::state::ProgressState;
use std::path::Path;

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    if let Some(reason) = &summary.aborted {
        println!("Run aborted: {}\n", reason);
    }

    println!("Overview:");
    println!("  Discovered URLs: {}", summary.discovered);
    println!("  Already processed: {}", summary.skipped_processed);
    println!("  Scheduled: {}", summary.scheduled);
    println!();

    println!("Outcomes:");
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Validation failed: {}", summary.validation_failed);
    println!("  Extraction failed: {}", summary.extraction_failed);
    println!();

    if let Some(duration) = summary.duration_seconds {
        println!("Elapsed: {:.1}s", duration);
    }
    println!(
        "Success Rate: {:.1}% ({} / {} units)",
        summary.success_rate(),
        summary.succeeded,
        summary.completed()
    );
    println!();

    println!("Artifacts:");
    for (label, path) in summary.artifacts() {
        println!("  {}: {}", label, path.display());
    }
}

/// Prints what a checkpoint holds, for `--status`
pub fn print_progress_status(state: &ProgressState, path: &Path) {
    println!("=== Checkpoint Status ===\n");
    println!("Checkpoint: {}", path.display());
    println!("  Processed URLs: {}", state.processed_count());
    println!("  Recorded failures: {}", state.failure_count());
    println!(
        "  Last updated: {}",
        state.last_updated.as_deref().unwrap_or("never")
    );
    if let Some(hash) = &state.config_hash {
        println!("  Config hash: {}", hash);
    }

    if !state.failed_urls.is_empty() {
        println!();
        println!("Most recent failures:");
        for failure in state.failed_urls.iter().rev().take(10) {
            println!("  - {} ({})", failure.url, failure.error);
        }
    }
}
