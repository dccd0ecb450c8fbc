//! Folio main entry point
//!
//! This is the command-line interface for the Folio document harvester.

use anyhow::Context;
use clap::Parser;
use folio::config::{load_config_with_hash, Config};
use folio::crawler::{Coordinator, FetchResult, Fetcher, LinkDiscoverer};
use folio::output::{generate_markdown_report, open_sink, print_summary};
use folio::DocumentTarget;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Folio: a document text harvester
///
/// Folio fetches a set of HTML documents, recovers their readable text from
/// loosely structured markup, and saves each one under a stable identifier.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A document text harvester", long_about = None)]
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

    /// Validate config and show what would be fetched without any network access
    #[arg(long, conflicts_with = "discover_only")]
    dry_run: bool,

    /// Fetch the index page, list the documents found on it and exit
    #[arg(long, conflicts_with = "dry_run")]
    discover_only: bool,

    /// Directory for text output, overriding the configuration
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.discover_only {
        handle_discover_only(&config).await?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("folio=info,warn"),
            1 => EnvFilter::new("folio=debug,info"),
            2 => EnvFilter::new("folio=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) {
    println!("=== Folio Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Delay between requests: {}ms", config.crawler.delay_ms);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);
    println!(
        "  Minimum accepted length: {} chars",
        config.crawler.min_accept_length
    );
    println!(
        "  Discovery: {}",
        if config.crawler.discover {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.identity);

    println!("\nExtraction:");
    println!("  Minimum blocks: {}", config.extraction.min_blocks);
    println!("  Minimum block length: {}", config.extraction.min_block_chars);
    println!("  ASCII only: {}", config.extraction.ascii_only);

    if config.crawler.discover {
        println!("\nLink Patterns ({}):", config.discovery.link_patterns.len());
        for pattern in &config.discovery.link_patterns {
            println!("  - {}", pattern);
        }
    }

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Directory: {}", config.output.directory);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\nConfigured Targets ({}):", config.targets.len());
    for entry in &config.targets {
        match DocumentTarget::from_entry(entry) {
            Ok(target) => {
                println!("  - {} ({})", target.display_name(), target.identifier());
                for url in target.candidate_urls() {
                    println!("    * {}", url);
                }
            }
            Err(e) => println!("  - {}: {}", entry.name, e),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --discover-only mode: lists the links found on the index page
async fn handle_discover_only(config: &Config) -> anyhow::Result<()> {
    let base_url = Url::parse(&config.crawler.base_url).context("Invalid base URL")?;
    let fetcher = Fetcher::new(
        &config.user_agent,
        Duration::from_secs(config.crawler.timeout_secs),
    )?;
    let discoverer = LinkDiscoverer::from_config(&config.discovery)?;

    let body = match fetcher.fetch(&base_url).await {
        FetchResult::Success { body, .. } => body,
        FetchResult::Unavailable { cause } => {
            anyhow::bail!("Index page {} unavailable: {}", base_url, cause)
        }
    };
    let links = discoverer.discover(&body, &base_url);

    println!("=== Documents linked from {} ===\n", base_url);
    for link in &links {
        println!("  - {}: {}", link.identifier, link.url);
    }
    println!("\n{} document links found", links.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let sink = open_sink(&config.output).context("Failed to open output")?;
    let location = sink.location();
    let mut coordinator = Coordinator::new(&config, sink)?;

    let result = match coordinator.resolve_targets(&config).await {
        Ok(targets) => coordinator.run(&targets).await,
        Err(e) => Err(e),
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&outcome, &location);

    if let Some(path) = &config.output.summary_path {
        generate_markdown_report(&outcome, config_hash, Path::new(path))
            .with_context(|| format!("Failed to write report to {}", path))?;
        println!("✓ Report written to: {}", path);
    }

    Ok(())
}
