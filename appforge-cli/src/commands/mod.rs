//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod download;
mod generate;
mod health;
mod shell;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project from a description and wait for it
    Generate {
        /// Project description
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Save the generated archive to this file once the job is done
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read project descriptions from stdin, one job per line
    Shell,
    /// Download the archive of a finished job
    Download {
        /// Job ID returned by the service
        job_id: String,

        /// Where to write the archive (defaults to <job-id>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the service is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate { prompt, output } => {
            generate::handle_generate(&prompt.join(" "), output, config).await
        }
        Commands::Shell => shell::handle_shell(config).await,
        Commands::Download { job_id, output } => {
            download::handle_download(&job_id, output, config).await
        }
        Commands::Health => health::handle_health(config).await,
    }
}
