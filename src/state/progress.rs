use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A unit that exhausted its retry budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    pub error: String,
    pub timestamp: String,
}

impl FailureRecord {
    pub fn new(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: error.into(),
            timestamp: now_rfc3339(),
        }
    }
}

/// Durable progress of a harvest run
///
/// Every completed unit joins `processed_urls`, whatever its outcome.
/// Failures are additionally appended to `failed_urls` and never
/// deduplicated, so the audit trail survives resumed runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub processed_urls: BTreeSet<String>,
    #[serde(default)]
    pub failed_urls: Vec<FailureRecord>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub config_hash: Option<String>,
}

impl ProgressState {
    pub fn new(config_hash: Option<String>) -> Self {
        Self {
            config_hash,
            ..Self::default()
        }
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed_urls.contains(url)
    }

    pub fn mark_processed(&mut self, url: &str) {
        self.processed_urls.insert(url.to_string());
    }

    /// Records a permanent failure and removes the URL from future runs
    pub fn record_failure(&mut self, url: &str, error: &str) {
        self.mark_processed(url);
        self.failed_urls.push(FailureRecord::new(url, error));
    }

    /// Discovered URLs not yet processed, in discovery order
    pub fn pending(&self, discovered: &[String]) -> Vec<String> {
        discovered
            .iter()
            .filter(|url| !self.is_processed(url))
            .cloned()
            .collect()
    }

    pub fn processed_count(&self) -> usize {
        self.processed_urls.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_urls.len()
    }

    pub(crate) fn touch(&mut self) {
        self.last_updated = Some(now_rfc3339());
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
