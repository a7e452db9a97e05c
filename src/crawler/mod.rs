//! Crawler module for profile discovery and harvesting
//!
//! This module contains the core harvesting logic, including:
//! - Listing traversal and profile URL discovery
//! - Retry with exponential backoff
//! - The concurrency-bounded worker pool
//! - Overall run coordination

mod coordinator;
mod discovery;
mod pool;
mod retry;

pub use coordinator::{run_harvest, Coordinator, INTERRUPTED};
pub use discovery::{candidate_urls, DiscoveryEngine, UrlAccumulator};
pub use pool::{DelayWindow, UnitContext, WorkerPool};
pub use retry::{retry_with_backoff, RetryOutcome, RetryPolicy};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Load the checkpoint (when resuming)
/// 2. Discover profile URLs from the listing page
/// 3. Extract, validate and write every unprocessed profile
/// 4. Flush progress, failures and the summary report
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file
/// * `resume` - Whether to skip URLs recorded in the checkpoint
pub async fn harvest(
    config: Config,
    config_hash: String,
    resume: bool,
) -> Result<RunSummary, HarvestError> {
    run_harvest(config, config_hash, resume).await
}
