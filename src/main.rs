//! Repo-Tally main entry point
//!
//! This is the command-line interface for the Repo-Tally repository ledger.

use anyhow::Context;
use clap::Parser;
use repo_tally::config::{load_config_with_hash, validate, Config};
use repo_tally::crawler::{ingest, StopReason};
use repo_tally::output::print_report;
use repo_tally::storage::{open_fresh_store, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Repo-Tally: an organization repository star ledger
///
/// Repo-Tally walks a paginated repository listing, stores the name,
/// language and star count of every repository in SQLite, and prints
/// them ordered by stars. Every run starts from an empty table.
#[derive(Parser, Debug)]
#[command(name = "repo-tally")]
#[command(version)]
#[command(about = "Tally an organization's repositories by stars", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the SQLite database path
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Override the page numbers to visit (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "PAGES")]
    pages: Option<Vec<u32>>,

    /// Override the pause between pages, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with = "report_only")]
    dry_run: bool,

    /// Print the repositories already in the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    report_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.report_only {
        handle_report_only(&config)?;
    } else {
        handle_run(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("repo_tally=info,warn"),
            1 => EnvFilter::new("repo_tally=debug,info"),
            2 => EnvFilter::new("repo_tally=trace,debug"),
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

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(database) = &cli.database {
        config.output.database_path = database.clone();
    }
    if let Some(pages) = &cli.pages {
        config.source.pages = pages.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.source.delay_ms = delay_ms;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) {
    println!("=== Repo-Tally Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Page parameter: {}", config.source.page_param);
    println!("  Pages: {:?}", config.source.pages);
    println!("  Delay between pages: {}ms", config.source.delay_ms);
    println!("  User agent: {}", config.source.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would reset the database and visit up to {} pages",
        config.source.pages.len()
    );
}

/// Handles the --report-only mode: prints what an earlier run stored
fn handle_report_only(config: &Config) -> anyhow::Result<()> {
    let db_path = Path::new(&config.output.database_path);
    let store = SqliteStore::open_existing(db_path)
        .with_context(|| format!("failed to open existing database {}", db_path.display()))?;
    print_report(&store).context("failed to read stored repositories")?;
    store.close()?;
    Ok(())
}

/// Handles the main run: reset, ingest, report
async fn handle_run(config: &Config) -> anyhow::Result<()> {
    let db_path = Path::new(&config.output.database_path);
    tracing::info!("Resetting database: {}", db_path.display());
    let mut store = open_fresh_store(db_path).context("failed to initialize database")?;

    tracing::info!(
        "Fetching {} pages from {}",
        config.source.pages.len(),
        config.source.base_url
    );
    let report = ingest(config, &mut store).await;

    match &report.stop {
        StopReason::Completed | StopReason::EmptyPage(_) => {
            tracing::info!("Ingestion finished: {} repositories stored", report.inserted)
        }
        StopReason::NetworkError { page, error } => {
            tracing::error!("Ingestion aborted at page {}: {}", page, error)
        }
        StopReason::StoreFailure { page, error } => {
            tracing::error!("Ingestion aborted at page {}: {}", page, error)
        }
        StopReason::SetupFailure { error } => {
            tracing::error!("Ingestion aborted before the first page: {}", error)
        }
    }

    print_report(&store).context("failed to read stored repositories")?;
    store.close()?;
    Ok(())
}
