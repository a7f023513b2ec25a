//! CLI for the GitHub Release Monitor.
//!
//! Performs a single monitoring pass: checks every configured repository for
//! a new release and announces it in Slack. Schedule it with cron or a timer.

use clap::Parser;
use release_monitor::{
    ChatSink, Collaborators, ConfigError, DryRunSink, JsonFileStore, MonitorConfig, RunSummary,
    Runner, RunnerError, SlackClient,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GitHub Release Monitor - Announce newly published GitHub releases in Slack.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the monitor config file.
    #[arg(long, default_value = "monitor.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token (overrides the config file).
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Slack bot token used to post messages.
    #[arg(long, env = "SLACK_TOKEN")]
    slack_token: Option<String>,

    /// Directory holding the last announced release per repository.
    #[arg(long, default_value = ".release-monitor")]
    state_dir: PathBuf,

    /// Maximum repositories processed at once (overrides the config file).
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print notifications instead of sending them, and don't save state.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab and reqwest enable different rustls backends; pick one for the process.
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        error!("A rustls crypto provider was already installed");
    }

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = MonitorConfig::load(&args.config)?;
    if let Some(token) = args.token {
        config.token = Some(token);
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
        config.validate(&args.config)?;
    }

    let sink: Arc<dyn ChatSink> = if args.dry_run {
        Arc::new(DryRunSink)
    } else {
        let token = args.slack_token.ok_or_else(|| ConfigError::ValidationError {
            path: "--slack-token".to_string(),
            message: "a Slack token is required unless --dry-run is set".to_string(),
        })?;
        Arc::new(SlackClient::new(token)?)
    };
    let store = Arc::new(JsonFileStore::new(args.state_dir));

    let collaborators = Collaborators::github(&config, sink, store)?;
    let runner = Runner::new(config, collaborators)?.with_dry_run(args.dry_run);
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Repositories checked: {}", summary.repositories_checked);
    println!("  Notifications sent: {}", summary.notifications_sent);
    println!("  Unchanged: {}", summary.unchanged);
    println!("  Without releases: {}", summary.skipped);
    println!("  Failed: {}", summary.failed);
}
