//! Generate command handler
//!
//! Submits one request and follows the job to its terminal state. Ctrl-C
//! stops following the job; the service keeps running it.

use anyhow::Result;
use appforge_client::{JobSession, JobTransport, Presenter};
use appforge_core::domain::job::{Job, JobState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::download::save_archive;
use crate::config::Config;
use crate::presenter::TerminalPresenter;

/// How a followed job ended, from the user's point of view
pub enum Outcome {
    /// The job never started; the presenter already showed why
    NotStarted,
    /// The user stopped watching
    Cancelled(Job),
    /// The job reached a terminal state
    Finished(Job, JobState),
}

/// Generate a project and optionally save the archive
pub async fn handle_generate(prompt: &str, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);
    let mut session = JobSession::new(
        Arc::clone(&client),
        config.poll_config(),
        config.recursion_limit,
    );
    let mut presenter = TerminalPresenter::new();

    match follow_job(&mut session, &mut presenter, prompt).await {
        Outcome::Finished(job, JobState::Done { .. }) => {
            if let Some(path) = output {
                save_archive(&client, &job.id, &path).await?;
            }
            Ok(())
        }
        Outcome::Finished(job, state) => {
            anyhow::bail!("Job {} ended as {}", job.id, state.label())
        }
        Outcome::Cancelled(job) => anyhow::bail!("Stopped following job {}", job.id),
        Outcome::NotStarted => anyhow::bail!("Job was not started"),
    }
}

/// Launch `prompt` on `session` and render every transition until the job ends
pub async fn follow_job<T: JobTransport>(
    session: &mut JobSession<T>,
    presenter: &mut TerminalPresenter,
    prompt: &str,
) -> Outcome {
    let job = match session.launch(prompt).await {
        Ok(job) => job,
        Err(e) => {
            debug!("Launch failed: {}", e);
            presenter.on_error(&e);
            return Outcome::NotStarted;
        }
    };

    loop {
        // `None` when interrupted
        let next = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => None,
            state = session.next_state() => Some(state),
        };

        match next {
            Some(Some(state)) => {
                presenter.on_state_change(&state);
                if state.is_terminal() {
                    return Outcome::Finished(job, state);
                }
            }
            Some(None) => return Outcome::Cancelled(job),
            None => {
                session.cancel();
                presenter.cancelled();
                return Outcome::Cancelled(job);
            }
        }
    }
}
