//! Shell command handler
//!
//! Reads one project description per line from stdin. A new line is only
//! read once the previous job has finished, so input is naturally locked
//! while a job runs. Ctrl-C during a job stops following it; Ctrl-C at the
//! prompt leaves the shell.

use anyhow::{Context, Result};
use appforge_client::JobSession;
use colored::*;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use super::generate::{Outcome, follow_job};
use crate::config::Config;
use crate::presenter::TerminalPresenter;

/// Run jobs for every line read from stdin until EOF or Ctrl-C
pub async fn handle_shell(config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);
    let mut session = JobSession::new(client, config.poll_config(), config.recursion_limit);
    let mut presenter = TerminalPresenter::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{}",
        "Describe a project and press Enter (Ctrl-D or Ctrl-C to quit).".bold()
    );

    loop {
        if presenter.input_enabled() {
            print!("{} ", ">".cyan());
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }

        let Some(line) = next_prompt(&mut lines, tokio::signal::ctrl_c()).await? else {
            break;
        };

        let outcome = follow_job(&mut session, &mut presenter, &line).await;
        if let Outcome::Finished(job, _) = outcome {
            println!("  {}", format!("job {}", job.id).dimmed());
        }
    }

    session.cancel();
    Ok(())
}

/// Next line of input, or `None` on EOF or once `interrupt` resolves
async fn next_prompt<R, F>(lines: &mut Lines<R>, interrupt: F) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        biased;
        signal = interrupt => {
            signal.context("Failed to listen for Ctrl-C")?;
            debug!("Interrupted at the prompt");
            println!();
            Ok(None)
        }
        line = lines.next_line() => line.context("Failed to read stdin"),
    }
}
