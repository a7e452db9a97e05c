use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Profile-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The single target site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Listing page that discovery starts from
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Value written into every record's `source` field
    #[serde(rename = "source-tag", default = "default_source_tag")]
    pub source_tag: String,

    /// Host pattern detail links must match (e.g., "*.example.com").
    /// Defaults to the listing page host.
    #[serde(rename = "allowed-domain", default)]
    pub allowed_domain: Option<String>,

    /// Path fragments that mark a detail-page href
    #[serde(rename = "detail-path-markers", default = "default_markers")]
    pub detail_path_markers: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of detail pages in flight
    pub concurrency: u32,

    /// Attempts per detail page before it is recorded as failed
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per attempt
    #[serde(rename = "retry-base-delay")]
    pub retry_base_delay: u64,

    /// Lower bound of the post-unit pause (milliseconds)
    #[serde(rename = "min-delay")]
    pub min_delay: u64,

    /// Upper bound of the post-unit pause (milliseconds)
    #[serde(rename = "max-delay")]
    pub max_delay: u64,

    /// Navigation timeout (milliseconds)
    #[serde(rename = "navigation-timeout")]
    pub navigation_timeout: u64,

    /// Bound on waiting for network quiescence (milliseconds)
    #[serde(rename = "idle-timeout")]
    pub idle_timeout: u64,

    /// Safety cap on listing iterations
    #[serde(rename = "max-listing-pages")]
    pub max_listing_pages: u32,

    /// Completed units between checkpoint flushes
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: u32,

    /// Stop discovery once this many URLs are known
    #[serde(rename = "target-count")]
    pub target_count: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            max_retries: 3,
            retry_base_delay: 1000,
            min_delay: 500,
            max_delay: 1500,
            navigation_timeout: 30_000,
            idle_timeout: 10_000,
            max_listing_pages: 50,
            checkpoint_interval: 10,
            target_count: None,
        }
    }
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout)
    }
}

/// Page-rendering session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// User agent presented to the target site
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Output configuration
///
/// File names are relative to `directory` unless absolute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,

    #[serde(rename = "records-jsonl")]
    pub records_jsonl: String,

    #[serde(rename = "records-csv")]
    pub records_csv: String,

    #[serde(rename = "failures-csv")]
    pub failures_csv: String,

    pub progress: String,

    #[serde(rename = "debug-directory")]
    pub debug_directory: String,

    pub summary: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            records_jsonl: "records.jsonl".to_string(),
            records_csv: "records.csv".to_string(),
            failures_csv: "failed_urls.csv".to_string(),
            progress: "progress.json".to_string(),
            debug_directory: "debug".to_string(),
            summary: "summary.md".to_string(),
        }
    }
}

impl OutputConfig {
    fn resolve(&self, name: &str) -> PathBuf {
        PathBuf::from(&self.directory).join(name)
    }

    pub fn records_jsonl_path(&self) -> PathBuf {
        self.resolve(&self.records_jsonl)
    }

    pub fn records_csv_path(&self) -> PathBuf {
        self.resolve(&self.records_csv)
    }

    pub fn failures_csv_path(&self) -> PathBuf {
        self.resolve(&self.failures_csv)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.resolve(&self.progress)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.resolve(&self.debug_directory)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.resolve(&self.summary)
    }
}

fn default_source_tag() -> String {
    "zenonco".to_string()
}

fn default_markers() -> Vec<String> {
    vec![
        "/doctor/".to_string(),
        "/oncologist/".to_string(),
        "/profile/".to_string(),
    ]
}
