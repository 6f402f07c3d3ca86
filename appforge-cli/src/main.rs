//! AppForge CLI
//!
//! Command-line front end for the generation service: submit a project
//! description, watch the job until it finishes and fetch the result.

mod commands;
mod config;
mod presenter;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "appforge")]
#[command(about = "Generate projects with the AppForge service", long_about = None)]
struct Cli {
    /// Generation service URL
    #[arg(long, env = "APPFORGE_SERVICE_URL", default_value = "http://127.0.0.1:8000")]
    service_url: String,

    /// Delay between status checks, in milliseconds
    #[arg(long, env = "APPFORGE_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Recursion limit sent with each request
    #[arg(long, env = "APPFORGE_RECURSION_LIMIT", default_value_t = 100)]
    recursion_limit: u32,

    /// Give up after this many status checks (polls until done when unset)
    #[arg(long, env = "APPFORGE_MAX_POLL_ATTEMPTS")]
    max_poll_attempts: Option<u32>,

    /// Timeout for each HTTP call, in seconds
    #[arg(long, env = "APPFORGE_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with job output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appforge_cli=warn,appforge_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        service_url: cli.service_url,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        recursion_limit: cli.recursion_limit,
        max_poll_attempts: cli.max_poll_attempts,
        request_timeout: Duration::from_secs(cli.request_timeout_secs),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
