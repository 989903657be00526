//! Cache-Preload main entry point
//!
//! This is the command-line interface for the Cache-Preload cache warmer.

use cache_preload::config::{compute_content_hash, parse_config, validate, Config};
use cache_preload::crawler::run_preload;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cache-Preload: warm a cache from a site's sitemaps
///
/// Cache-Preload reads every page URL listed in the given sitemaps, fetches
/// each page once with a small pool of concurrent workers, and retries the
/// pages that failed in a second serial pass.
#[derive(Parser, Debug)]
#[command(name = "cache-preload")]
#[command(version)]
#[command(about = "Warm a cache by fetching every page in a set of sitemaps", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Sitemap URL to read (repeatable, added to the configured list)
    #[arg(short, long = "sitemap", value_name = "URL")]
    sitemaps: Vec<String>,

    /// Number of concurrent fetch workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be preloaded without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Exit right after the summary instead of waiting for Enter
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let summary = run_preload(config).await?;
    tracing::debug!("Run finished at {}", summary.finished_at);

    if !cli.no_wait {
        wait_for_enter()?;
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
            0 => EnvFilter::new("cache_preload=info,warn"),
            1 => EnvFilter::new("cache_preload=debug,info"),
            2 => EnvFilter::new("cache_preload=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides, then validates
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config = parse_config(&content)?;
            tracing::info!(
                "Configuration loaded successfully (hash: {})",
                compute_content_hash(&content)
            );
            config
        }
        None => Config::default(),
    };

    config.sitemaps.extend(cli.sitemaps.iter().cloned());
    if let Some(workers) = cli.workers {
        config.preload.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.preload.timeout_secs = timeout;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Cache-Preload Dry Run ===\n");

    println!("Preload Configuration:");
    println!("  Workers: {}", config.preload.workers);
    println!("  Timeout: {}s", config.preload.timeout_secs);

    println!("\nHTTP:");
    println!(
        "  User agent: {}",
        config
            .http
            .user_agent
            .clone()
            .unwrap_or_else(cache_preload::crawler::default_user_agent)
    );
    for (name, value) in &config.http.headers {
        println!("  {}: {}", name, value);
    }

    println!("\nSitemaps ({}):", config.sitemaps.len());
    for sitemap in &config.sitemaps {
        println!("  - {}", sitemap);
    }

    println!("\n✓ Configuration is valid");
}

/// Keeps the console open until the user presses Enter
fn wait_for_enter() -> io::Result<()> {
    print!("\nPress Enter to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
