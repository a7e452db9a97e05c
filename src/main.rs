//! Profile-Harvest main entry point
//!
//! This is the command-line interface for the Profile-Harvest profile harvester.

use anyhow::{bail, Context};
use clap::Parser;
use profile_harvest::config::{load_config_with_hash, Config};
use profile_harvest::crawler::harvest;
use profile_harvest::output::{print_progress_status, print_summary};
use profile_harvest::state::CheckpointStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Profile-Harvest: a resumable profile harvester
///
/// Profile-Harvest walks a listing page, discovers profile pages, extracts
/// structured records from each one and writes them to JSONL and CSV,
/// checkpointing progress so interrupted runs can pick up where they left off.
#[derive(Parser, Debug)]
#[command(name = "profile-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable single-site profile harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh harvest, ignoring the checkpoint
    #[arg(long)]
    fresh: bool,

    /// Stop discovery after this many profile URLs
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Run with a visible browser window
    #[arg(long)]
    headful: bool,

    /// Validate config and show what would be harvested without harvesting
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show the checkpoint status and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config, cli.fresh);
    } else if cli.status {
        handle_status(&config)?;
    } else {
        handle_harvest(config, config_hash, !cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("profile_harvest=info,warn"),
            1 => EnvFilter::new("profile_harvest=debug,info"),
            2 => EnvFilter::new("profile_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(limit) = cli.limit {
        if limit == 0 {
            bail!("--limit must be at least 1");
        }
        config.crawler.target_count = Some(limit);
    }
    if cli.headful {
        config.browser.headless = false;
    }
    Ok(())
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config, fresh: bool) {
    println!("=== Profile-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Source tag: {}", config.site.source_tag);
    println!(
        "  Allowed domain: {}",
        config
            .site
            .allowed_domain
            .as_deref()
            .unwrap_or("(listing host)")
    );
    println!(
        "  Detail path markers: {}",
        config.site.detail_path_markers.join(", ")
    );

    let crawler = &config.crawler;
    println!("\nCrawler Configuration:");
    println!("  Concurrency: {}", crawler.concurrency);
    println!(
        "  Max retries: {} (base delay {}ms)",
        crawler.max_retries, crawler.retry_base_delay
    );
    println!("  Delay: {}-{}ms", crawler.min_delay, crawler.max_delay);
    println!("  Navigation timeout: {}ms", crawler.navigation_timeout);
    println!("  Idle timeout: {}ms", crawler.idle_timeout);
    println!("  Max listing pages: {}", crawler.max_listing_pages);
    println!("  Checkpoint interval: {}", crawler.checkpoint_interval);
    match crawler.target_count {
        Some(target) => println!("  Limit: {} profiles", target),
        None => println!("  Limit: none"),
    }

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!("  User agent: {}", config.browser.user_agent);

    let output = &config.output;
    println!("\nOutput:");
    println!("  Records (JSONL): {}", output.records_jsonl_path().display());
    println!("  Records (CSV): {}", output.records_csv_path().display());
    println!("  Failures: {}", output.failures_csv_path().display());
    println!("  Checkpoint: {}", output.progress_path().display());
    println!("  Debug snapshots: {}", output.debug_dir().display());
    println!("  Summary: {}", output.summary_path().display());

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would {} harvesting from {}",
        if fresh { "start fresh" } else { "resume" },
        config.site.listing_url
    );
}

/// Handles the --status mode: prints the checkpoint contents
fn handle_status(config: &Config) -> anyhow::Result<()> {
    let store = CheckpointStore::new(config.output.progress_path());
    let state = store
        .load()
        .with_context(|| format!("Failed to read checkpoint {}", store.path().display()))?;

    print_progress_status(&state, store.path());
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: String, resume: bool) -> anyhow::Result<()> {
    if resume {
        tracing::info!("Starting harvest (will resume from checkpoint if present)");
    } else {
        tracing::info!("Starting fresh harvest");
    }
    tracing::info!(
        "Concurrency: {}, retries: {}, delay: {}-{}ms",
        config.crawler.concurrency,
        config.crawler.max_retries,
        config.crawler.min_delay,
        config.crawler.max_delay
    );

    let summary = harvest(config, config_hash, resume)
        .await
        .context("Harvest failed")?;

    print_summary(&summary);

    if let Some(reason) = &summary.aborted {
        bail!("Harvest stopped early: {}", reason);
    }

    tracing::info!("Harvest completed successfully");
    Ok(())
}
