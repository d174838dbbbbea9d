//! Scope-Crawler main entry point
//!
//! This is the command-line interface for the Scope-Crawler site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use futures::StreamExt;
use regex::Regex;
use scope_crawler::config::{load_config_with_hash, validate_path_prefix, Config};
use scope_crawler::output::{print_statistics, CrawlStatistics};
use scope_crawler::url::{PathPrefixMatcher, UrlRegexMatcher};
use scope_crawler::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scope-Crawler: a breadth-first crawler confined to one site
///
/// Scope-Crawler starts at a seed URL, follows links that stay under it,
/// and prints every page that passes the whitelist/blacklist matchers.
#[derive(Parser, Debug)]
#[command(name = "scope-crawler")]
#[command(version)]
#[command(about = "A breadth-first crawler confined to one site", long_about = None)]
struct Cli {
    /// Seed URL (overrides `seed` in the configuration file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to return, 0 = unbounded
    #[arg(long)]
    limit: Option<usize>,

    /// Stop the crawl on the first failed fetch
    #[arg(long)]
    stop_on_error: bool,

    /// Only return pages whose path starts with this prefix (repeatable)
    #[arg(long, value_name = "PREFIX")]
    whitelist_prefix: Vec<String>,

    /// Do not return pages whose URL matches this regex (repeatable)
    #[arg(long, value_name = "REGEX")]
    blacklist_regex: Vec<Regex>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let Some(seed) = cli.seed.clone().or_else(|| config.crawler.seed.clone()) else {
        bail!("No seed URL given on the command line or in the configuration");
    };

    let mut crawler =
        Crawler::from_config(&config).context("Failed to build crawler from configuration")?;
    apply_overrides(&mut crawler, &cli)?;

    handle_crawl(&mut crawler, &seed).await?;

    if !cli.quiet {
        println!();
        print_statistics(&CrawlStatistics::from_crawler(&crawler));
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
            0 => EnvFilter::new("scope_crawler=info,warn"),
            1 => EnvFilter::new("scope_crawler=debug,info"),
            2 => EnvFilter::new("scope_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Layers command-line flags over the configuration file
fn apply_overrides(crawler: &mut Crawler, cli: &Cli) -> anyhow::Result<()> {
    if let Some(limit) = cli.limit {
        crawler.set_limit(limit);
    }
    if cli.stop_on_error {
        crawler.set_stop_on_error(true);
    }
    for prefix in &cli.whitelist_prefix {
        validate_path_prefix(prefix).context("Invalid --whitelist-prefix")?;
        crawler.add_whitelist_url_matcher(PathPrefixMatcher::new(prefix.as_str()));
    }
    for regex in &cli.blacklist_regex {
        crawler.add_blacklist_url_matcher(UrlRegexMatcher::from(regex.clone()));
    }
    Ok(())
}

/// Handles the main crawl operation, printing each returned page
async fn handle_crawl(crawler: &mut Crawler, seed: &str) -> anyhow::Result<()> {
    tracing::info!(
        limit = crawler.limit(),
        stop_on_error = crawler.stop_on_error(),
        "Starting crawl"
    );

    let crawl = crawler
        .crawl(seed)
        .with_context(|| format!("Cannot crawl from seed {}", seed))?;

    let pages = crawl.into_stream();
    futures::pin_mut!(pages);

    while let Some(page) = pages.next().await {
        let document = page.document();
        println!(
            "{}\t{}\t{}",
            document.status,
            page.url(),
            document.title.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
