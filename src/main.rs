//! Docglean main entry point
//!
//! This is the command-line interface for the Docglean content harvester.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use docglean::config::load_config;
use docglean::crawler::{self, CrawlMode};
use docglean::GleanError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docglean: a documentation and glossary content harvester
///
/// Docglean crawls a documentation site or a glossary site, extracts the
/// readable content, and persists it for downstream embedding generation.
#[derive(Parser, Debug)]
#[command(name = "docglean")]
#[command(version = "1.0.0")]
#[command(about = "A documentation and glossary content harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Which crawl to run
    #[arg(value_enum, value_name = "MODE")]
    mode: ModeArg,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// CLI mirror of [`CrawlMode`]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Crawl documentation pages from the sitemap
    Docs,
    /// Crawl glossary term definitions from the index page
    Glossary,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Docs => CrawlMode::Docs,
            ModeArg::Glossary => CrawlMode::Glossary,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    let mode = CrawlMode::from(cli.mode);
    tracing::info!(
        "Starting {} crawl against {}",
        mode,
        config.site.base_url
    );

    match crawler::run(mode, config).await {
        Ok(summary) => {
            println!("=== Crawl Summary ===");
            println!("Mode:      {}", mode);
            println!("Items:     {}", summary.total);
            println!("Saved:     {}", summary.saved);
            println!("Skipped:   {}", summary.skipped);
            println!("Failed:    {}", summary.failed);
            println!("Requests:  {}", summary.requests);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            if let Some(hint) = operator_hint(&e) {
                tracing::error!("Hint: {}", hint);
            }
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docglean=info,warn"),
            1 => EnvFilter::new("docglean=debug,info"),
            2 => EnvFilter::new("docglean=trace,debug"),
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

/// Maps a fatal error to a short operator hint, when one applies
fn operator_hint(error: &GleanError) -> Option<&'static str> {
    match error {
        GleanError::Store(store_error) => store_error.operator_hint(),
        GleanError::Discovery { .. } => Some(
            "The discovery source could not be fetched; check network \
             connectivity and the configured sitemap/glossary index URL",
        ),
        GleanError::Config(_) => {
            Some("Review the configuration file against the documented keys")
        }
        _ => None,
    }
}
