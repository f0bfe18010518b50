use crate::commands::{run_discover, run_display, run_smoke_test};
use clap::{Args, Parser, Subcommand};
use job_scout::config::AppConfig;
use job_scout::error::AppError;
use job_scout::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "job-scout",
    about = "Scrape a job board, filter postings by keyword, and track applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and filter postings, then record the ones you applied to (default command)
    Discover(DiscoverArgs),
    /// Print every job recorded as applied
    Display(DisplayArgs),
    /// Reset a disposable database and run a smoke sequence against it
    Test(SmokeTestArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct DiscoverArgs {
    /// Override the configured job board URL
    #[arg(long)]
    pub(crate) source_url: Option<String>,
    /// Override the configured database path
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DisplayArgs {
    /// Override the configured database path
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
    /// Emit the records as a JSON array
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SmokeTestArgs {
    /// Disposable database to reset (defaults to JOBSCOUT_TEST_DB_PATH)
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Discover(DiscoverArgs::default()));

    match command {
        Command::Discover(args) => run_discover(config, args).await,
        Command::Display(args) => run_display(config, args),
        Command::Test(args) => run_smoke_test(config, args),
    }
}
