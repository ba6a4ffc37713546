mod app;
mod classify;
mod error;
mod export;
mod fetcher;
mod logging;
mod models;
mod parser;
mod store;
mod tui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use error::HnJobsError;
use fetcher::HnClient;
use models::{FilterState, Job};
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "jobs_output.md";

#[derive(Parser)]
#[command(name = "hn-jobs")]
#[command(about = "Browse and filter postings from the monthly 'Who is hiring?' thread")]
struct Cli {
    /// Markdown dump of the thread (default: ./jobs_output.md, then ../jobs_output.md)
    input: Option<PathBuf>,

    /// Start with US-only postings excluded
    #[arg(long)]
    exclude_us: bool,

    /// Fetch the latest thread instead of reading a file
    #[arg(long)]
    fetch: bool,

    /// Base URL of the HN search API
    #[arg(long, env = "HN_JOBS_API_URL", default_value = fetcher::ALGOLIA_API)]
    api_url: String,

    /// Write diagnostic logs to this file (level taken from RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path)?;
    }

    let jobs = if cli.fetch {
        load_remote(&cli.api_url)?
    } else {
        load_file(cli.input.as_deref())?
    };

    let filters = FilterState {
        exclude_us_only: cli.exclude_us,
        ..Default::default()
    };
    let app = App::new(jobs, filters);
    tracing::info!(
        total = app.store().total(),
        visible = app.store().visible_len(),
        "starting browser"
    );

    tui::run_browse(app)
}

fn load_remote(api_url: &str) -> Result<Vec<Job>> {
    println!("Searching for latest \"Who is hiring?\" thread...");
    let client = HnClient::new(api_url)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (_thread, jobs) = runtime.block_on(fetcher::fetch_latest_jobs(&client))?;
    println!("Parsed {} jobs.", jobs.len());
    Ok(jobs)
}

fn load_file(given: Option<&Path>) -> Result<Vec<Job>> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let path = resolve_input(given, &cwd);
    if !path.exists() {
        return Err(HnJobsError::InputNotFound { path }.into());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "loading postings");
    Ok(parser::parse_jobs_output(&content))
}

/// Given path, else `./jobs_output.md`, else `../jobs_output.md`.
/// Falls back to the local default so the error names the expected location.
fn resolve_input(given: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(path) = given {
        return cwd.join(path);
    }

    let local = cwd.join(DEFAULT_INPUT);
    let parent = cwd.join("..").join(DEFAULT_INPUT);
    if local.exists() {
        local
    } else if parent.exists() {
        parent
    } else {
        local
    }
}
