//! Concurrency-bounded execution of harvest units
//!
//! This module handles:
//! - Admission of at most N units at a time via a semaphore
//! - One isolated page session per unit, closed on every exit path
//! - Retry-wrapped extraction followed by validation
//! - A randomized pause before a finished unit's slot is released
//!
//! Completed units are reported back to a single control loop, which is the
//! only place progress and output files are mutated.

use crate::browser::{Browser, PageSession};
use crate::config::Config;
use crate::crawler::retry::{retry_with_backoff, RetryPolicy};
use crate::extract::RecordExtractor;
use crate::output::save_debug_html;
use crate::state::{CompletedUnit, UnitOutcome};
use crate::url::generate_slug;
use crate::validation::{validate_record, ValidationResult};
use crate::{HarvestError, NavigationError};
use futures::FutureExt;
use rand::Rng;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Inclusive window for the pause after each unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    pub min: Duration,
    pub max: Duration,
}

impl DelayWindow {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// A uniformly random duration within the window
    pub fn sample(&self) -> Duration {
        if self.max == self.min {
            return self.min;
        }
        let millis = rand::thread_rng()
            .gen_range(self.min.as_millis() as u64..=self.max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

/// Everything a unit needs, shared read-only by all units
pub struct UnitContext {
    pub browser: Arc<dyn Browser>,
    pub extractor: RecordExtractor,
    pub retry: RetryPolicy,
    pub source_tag: String,
    pub debug_dir: PathBuf,
    pub delay: DelayWindow,
}

impl UnitContext {
    pub fn from_config(config: &Config, browser: Arc<dyn Browser>) -> Self {
        let crawler = &config.crawler;
        Self {
            browser,
            extractor: RecordExtractor::new(
                config.site.source_tag.clone(),
                config.site.listing_url.clone(),
                crawler.navigation_timeout(),
                crawler.idle_timeout(),
            ),
            retry: RetryPolicy::from_config(crawler),
            source_tag: config.site.source_tag.clone(),
            debug_dir: config.output.debug_dir(),
            delay: DelayWindow::new(
                Duration::from_millis(crawler.min_delay),
                Duration::from_millis(crawler.max_delay),
            ),
        }
    }
}

/// Runs units under a global concurrency ceiling
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    context: Arc<UnitContext>,
}

impl WorkerPool {
    pub fn new(concurrency: usize, context: UnitContext) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            context: Arc::new(context),
        }
    }

    /// Processes every URL, reporting each completed unit to `on_complete`
    ///
    /// Units finish in any order. If `on_complete` fails, no further units
    /// are admitted, units already in flight are abandoned, and the error is
    /// returned.
    pub async fn run<F>(&self, urls: Vec<String>, mut on_complete: F) -> Result<(), HarvestError>
    where
        F: FnMut(CompletedUnit) -> Result<(), HarvestError>,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<CompletedUnit>();
        let mut pending = urls.into_iter();
        let mut tasks = JoinSet::new();
        let mut in_flight = 0usize;
        let mut exhausted = false;

        loop {
            if exhausted && in_flight == 0 {
                break;
            }

            tokio::select! {
                permit = Arc::clone(&self.semaphore).acquire_owned(), if !exhausted => {
                    let Ok(permit) = permit else {
                        exhausted = true;
                        continue;
                    };
                    let Some(url) = pending.next() else {
                        exhausted = true;
                        continue;
                    };

                    in_flight += 1;
                    let context = Arc::clone(&self.context);
                    let tx = tx.clone();
                    tasks.spawn(async move {
                        let unit = run_guarded(&context, url).await;
                        // The receiver only goes away when the run is abandoned
                        let _ = tx.send(unit);
                        tokio::time::sleep(context.delay.sample()).await;
                        drop(permit);
                    });
                }
                Some(unit) = rx.recv() => {
                    in_flight -= 1;
                    if let Err(e) = on_complete(unit) {
                        tasks.shutdown().await;
                        return Err(e);
                    }
                }
            }
        }

        // Only post-unit pauses remain; nothing is left to admit
        tasks.shutdown().await;
        Ok(())
    }
}

/// Runs a unit, converting a panic into an extraction failure
async fn run_guarded(context: &UnitContext, url: String) -> CompletedUnit {
    match AssertUnwindSafe(run_unit(context, url.clone()))
        .catch_unwind()
        .await
    {
        Ok(unit) => unit,
        Err(_) => {
            tracing::error!(url = %url, "Unit panicked");
            CompletedUnit {
                url,
                outcome: UnitOutcome::ExtractionFailed("unit panicked".to_string()),
                attempts: 0,
                debug_snapshot: None,
            }
        }
    }
}

/// Owns a unit's page session and closes it however the unit ends
///
/// The normal path closes through [`PageGuard::close`]. A unit that unwinds
/// or is abandoned mid-flight hands the close to the runtime on drop.
struct PageGuard {
    page: Option<Box<dyn PageSession>>,
}

impl PageGuard {
    fn new(page: Box<dyn PageSession>) -> Self {
        Self { page: Some(page) }
    }

    fn session(&mut self) -> Option<&mut (dyn PageSession + 'static)> {
        self.page.as_deref_mut()
    }

    async fn close(mut self) {
        if let Some(mut page) = self.page.take() {
            page.close().await;
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        let Some(mut page) = self.page.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    page.close().await;
                });
            }
            Err(_) => tracing::warn!("Page session dropped outside the runtime, not closed"),
        }
    }
}

/// One unit: open a page, extract with retry, validate, close the page
async fn run_unit(context: &UnitContext, url: String) -> CompletedUnit {
    let page = match context.browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(url = %url, "Could not open page session: {}", e);
            return CompletedUnit {
                url,
                outcome: UnitOutcome::ExtractionFailed(e.to_string()),
                attempts: 0,
                debug_snapshot: None,
            };
        }
    };

    let extractor = &context.extractor;
    let retried = retry_with_backoff(&context.retry, &url, PageGuard::new(page), |_, mut page| {
        let url = url.clone();
        async move {
            let result = match page.session() {
                Some(session) => extractor.extract(session, &url).await,
                None => Err(NavigationError::Other {
                    url: url.clone(),
                    message: "page session already closed".to_string(),
                }),
            };
            (page, result)
        }
    })
    .await;

    let mut page = retried.state;
    let mut debug_snapshot = None;

    let outcome = match retried.result {
        Ok(record) => match validate_record(record, &context.source_tag) {
            ValidationResult::Valid(record) => UnitOutcome::Succeeded(record),
            ValidationResult::Invalid(violations) => {
                let outcome = UnitOutcome::ValidationFailed(violations);
                tracing::warn!(url = %url, "{}", outcome);
                outcome
            }
        },
        Err(e) => {
            debug_snapshot = save_failure_snapshot(context, &mut page, &url, &e).await;
            UnitOutcome::ExtractionFailed(e.to_string())
        }
    };

    page.close().await;

    CompletedUnit {
        url,
        outcome,
        attempts: retried.attempts,
        debug_snapshot,
    }
}

async fn save_failure_snapshot(
    context: &UnitContext,
    page: &mut PageGuard,
    url: &str,
    error: &NavigationError,
) -> Option<PathBuf> {
    let content = match page.session() {
        Some(session) => session.content().await.ok(),
        None => None,
    };
    let html = content.unwrap_or_else(|| format!("<!-- {} -->\n", error));

    match save_debug_html(&context.debug_dir, &generate_slug(url, "profile"), &html) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(url = %url, "Failed to save debug snapshot: {}", e);
            None
        }
    }
}
