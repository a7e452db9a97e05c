//! Harvest coordinator - main run orchestration logic
//!
//! This module ties the stages of a run together:
//! - Loading (or discarding) the checkpoint
//! - Acquiring the browsing session and discovering profile URLs
//! - Scheduling the unprocessed URLs on the worker pool
//! - Writing records and progress as units complete
//! - The final flush of progress, failures and the run summary

use crate::browser::{Browser, HttpBrowser};
use crate::config::Config;
use crate::crawler::discovery::DiscoveryEngine;
use crate::crawler::pool::{UnitContext, WorkerPool};
use crate::output::{generate_markdown_summary, write_failures, OutputSinks, RunSummary};
use crate::state::{CheckpointStore, CompletedUnit, ProgressState, UnitOutcome};
use crate::url::CandidateFilter;
use crate::HarvestError;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;

/// Reason recorded when a run is stopped by Ctrl-C
pub const INTERRUPTED: &str = "interrupted";

/// Main harvest coordinator
pub struct Coordinator {
    config: Config,
    config_hash: String,
    resume: bool,
    browser: Option<Arc<dyn Browser>>,
}

impl Coordinator {
    /// Creates a coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the configuration file, stored in the checkpoint
    /// * `resume` - Whether to skip URLs already in the checkpoint
    pub fn new(config: Config, config_hash: impl Into<String>, resume: bool) -> Self {
        Self {
            config,
            config_hash: config_hash.into(),
            resume,
            browser: None,
        }
    }

    /// Uses `browser` instead of the HTTP-backed default
    pub fn with_browser(mut self, browser: Arc<dyn Browser>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Runs the harvest to completion
    ///
    /// The checkpoint, failures file and summary are flushed whether the run
    /// completes, is interrupted, or fails after the checkpoint was loaded.
    /// An interrupted run returns its summary with `aborted` set.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let store = CheckpointStore::new(self.config.output.progress_path());
        let mut state = self.load_state(&store)?;
        let mut summary = self.new_summary();
        let started = Instant::now();

        let result = self.harvest(&store, &mut state, &mut summary).await;
        if let Err(e) = &result {
            tracing::error!("Harvest aborted: {}", e);
            summary.aborted = Some(e.to_string());
        }

        let flushed = self.finish(&store, &mut state, &mut summary, started);
        result?;
        flushed?;

        Ok(summary)
    }

    fn load_state(&self, store: &CheckpointStore) -> Result<ProgressState, HarvestError> {
        if !self.resume {
            tracing::info!("Starting fresh harvest (ignoring previous progress)");
            return Ok(ProgressState::new(Some(self.config_hash.clone())));
        }

        let mut state = store.load()?;
        match state.config_hash.as_deref() {
            Some(previous) if previous != self.config_hash => {
                tracing::warn!(
                    "Configuration changed since the checkpoint was written ({} -> {}); \
                     previous progress is still honoured",
                    previous,
                    self.config_hash
                );
            }
            _ => {}
        }
        state.config_hash = Some(self.config_hash.clone());

        tracing::info!(
            "Resuming: {} URLs already processed, {} previously failed",
            state.processed_count(),
            state.failure_count()
        );
        Ok(state)
    }

    fn new_summary(&self) -> RunSummary {
        let output = &self.config.output;
        RunSummary {
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            config_hash: self.config_hash.clone(),
            records_jsonl: output.records_jsonl_path(),
            records_csv: output.records_csv_path(),
            progress: output.progress_path(),
            debug_directory: output.debug_dir(),
            summary: output.summary_path(),
            ..RunSummary::new()
        }
    }

    fn acquire_browser(&self) -> Result<Arc<dyn Browser>, HarvestError> {
        if let Some(browser) = &self.browser {
            return Ok(Arc::clone(browser));
        }

        tracing::info!(
            "Launching browsing session (headless: {})",
            self.config.browser.headless
        );
        let browser = HttpBrowser::new(
            &self.config.browser,
            self.config.crawler.navigation_timeout(),
        )?;
        Ok(Arc::new(browser))
    }

    async fn discover(&self, browser: &dyn Browser) -> Result<Vec<String>, HarvestError> {
        let filter = CandidateFilter::for_site(&self.config.site)?;
        let engine = DiscoveryEngine::new(&self.config, filter);

        let mut page = browser.new_page().await?;
        let discovered = engine.discover(page.as_mut()).await;
        page.close().await;

        discovered
    }

    async fn harvest(
        &self,
        store: &CheckpointStore,
        state: &mut ProgressState,
        summary: &mut RunSummary,
    ) -> Result<(), HarvestError> {
        let browser = self.acquire_browser()?;

        let discovered = self.discover(browser.as_ref()).await?;
        let pending = state.pending(&discovered);

        summary.discovered = discovered.len();
        summary.skipped_processed = discovered.len() - pending.len();
        summary.scheduled = pending.len();

        tracing::info!(
            "URLs to process: {} ({} already processed)",
            pending.len(),
            summary.skipped_processed
        );

        if pending.is_empty() {
            tracing::info!("All discovered URLs already processed");
            return Ok(());
        }

        let sinks = OutputSinks::open(&summary.records_jsonl, &summary.records_csv)?;
        let pool = WorkerPool::new(
            self.config.crawler.concurrency as usize,
            UnitContext::from_config(&self.config, browser),
        );

        let mut recorder =
            UnitRecorder::new(store, sinks, self.config.crawler.checkpoint_interval as usize);

        let interrupted = {
            let on_complete = |unit: CompletedUnit| -> Result<(), HarvestError> {
                recorder.complete(unit, state, summary)
            };

            tokio::select! {
                result = pool.run(pending, on_complete) => {
                    result?;
                    false
                }
                _ = tokio::signal::ctrl_c() => true,
            }
        };

        if interrupted {
            tracing::warn!("Interrupted; flushing progress");
            summary.aborted = Some(INTERRUPTED.to_string());
        }

        Ok(())
    }

    /// Final flush of progress, failures and the summary report
    fn finish(
        &self,
        store: &CheckpointStore,
        state: &mut ProgressState,
        summary: &mut RunSummary,
        started: Instant,
    ) -> Result<(), HarvestError> {
        summary.finished_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        summary.duration_seconds = Some(started.elapsed().as_secs_f64());
        summary.failures = state.failed_urls.clone();

        store.save(state)?;

        let failures_path = self.config.output.failures_csv_path();
        if write_failures(&failures_path, &state.failed_urls)? {
            summary.failures_csv = Some(failures_path);
        }

        generate_markdown_summary(summary, &summary.summary)?;

        tracing::info!(
            "Harvest finished: {} succeeded, {} validation failed, {} extraction failed",
            summary.succeeded,
            summary.validation_failed,
            summary.extraction_failed
        );
        Ok(())
    }
}

/// Applies completed units in arrival order, saving progress every
/// `interval` units
struct UnitRecorder<'a> {
    store: &'a CheckpointStore,
    sinks: OutputSinks,
    interval: usize,
    completed: usize,
}

impl<'a> UnitRecorder<'a> {
    fn new(store: &'a CheckpointStore, sinks: OutputSinks, interval: usize) -> Self {
        Self {
            store,
            sinks,
            interval: interval.max(1),
            completed: 0,
        }
    }

    fn complete(
        &mut self,
        unit: CompletedUnit,
        state: &mut ProgressState,
        summary: &mut RunSummary,
    ) -> Result<(), HarvestError> {
        record_unit(&unit, state, &mut self.sinks, summary)?;

        self.completed += 1;
        if self.completed % self.interval == 0 {
            self.store.save(state)?;
            tracing::info!(
                "Progress: {} completed this run, {} processed overall",
                self.completed,
                state.processed_count()
            );
        }
        Ok(())
    }
}

/// Applies one completed unit to the outputs, progress and counts
fn record_unit(
    unit: &CompletedUnit,
    state: &mut ProgressState,
    sinks: &mut OutputSinks,
    summary: &mut RunSummary,
) -> Result<(), HarvestError> {
    if unit.debug_snapshot.is_some() {
        summary.debug_snapshots += 1;
    }

    match &unit.outcome {
        UnitOutcome::Succeeded(record) => {
            sinks.write_record(record)?;
            state.mark_processed(&unit.url);
            summary.succeeded += 1;
            tracing::info!(
                url = %unit.url,
                attempts = unit.attempts,
                "Harvested {}",
                record.name.as_deref().unwrap_or("unnamed")
            );
        }
        UnitOutcome::ValidationFailed(_) => {
            state.mark_processed(&unit.url);
            summary.validation_failed += 1;
        }
        UnitOutcome::ExtractionFailed(error) => {
            state.record_failure(&unit.url, error);
            summary.extraction_failed += 1;
            tracing::error!(url = %unit.url, attempts = unit.attempts, "{}", unit.outcome);
        }
    }

    Ok(())
}

/// Runs a harvest with the HTTP-backed browser
///
/// # Example
///
/// ```no_run
/// use profile_harvest::config::load_config_with_hash;
/// use profile_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("harvest.toml"))?;
/// let summary = run_harvest(config, hash, true).await?;
/// println!("{} records", summary.succeeded);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: Config,
    config_hash: String,
    resume: bool,
) -> Result<RunSummary, HarvestError> {
    Coordinator::new(config, config_hash, resume).run().await
}
