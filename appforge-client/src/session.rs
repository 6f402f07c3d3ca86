//! Job session
//!
//! A [`JobSession`] is one instance of the job-lifecycle component: it owns
//! the submitter, the poller and the single [`PollHandle`], and hands every
//! state transition of the current job to whoever renders it. States that
//! belong to an earlier job are dropped, so a late `Done` can never be
//! mistaken for the result of the job that replaced it.

use appforge_core::domain::job::{Job, JobId, JobState};
use appforge_core::domain::request::GenerationRequest;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::error::{LaunchError, SubmitError};
use crate::poller::{PollConfig, PollHandle, Poller, StateUpdate};
use crate::submitter::Submitter;
use crate::transport::JobTransport;

/// Tracks at most one generation job at a time
///
/// Dropping the session stops any poll it still owns.
pub struct JobSession<T> {
    submitter: Submitter<T>,
    poller: Poller<T>,
    recursion_limit: u32,
    active: Option<PollHandle>,
    /// The job being tracked, with the last state handed out for it
    job: Option<Job>,
    /// Last state handed out, including `Submitting`
    state: Option<JobState>,
    /// States raised by the session itself, delivered before polled ones
    local: VecDeque<JobState>,
    updates_tx: UnboundedSender<StateUpdate>,
    updates_rx: UnboundedReceiver<StateUpdate>,
}

impl<T: JobTransport> JobSession<T> {
    /// Creates an idle session
    ///
    /// # Arguments
    /// * `transport` - Connection to the generation service
    /// * `poll` - Polling cadence and optional attempt ceiling
    /// * `recursion_limit` - Sent with every request
    pub fn new(transport: Arc<T>, poll: PollConfig, recursion_limit: u32) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            submitter: Submitter::new(Arc::clone(&transport)),
            poller: Poller::new(transport, poll),
            recursion_limit,
            active: None,
            job: None,
            state: None,
            local: VecDeque::new(),
            updates_tx,
            updates_rx,
        }
    }

    /// Validates `text`, submits it and starts polling the new job
    ///
    /// On success [`JobState::Submitting`] is the first state handed out for
    /// the job. Errors are returned directly and never start a poll. The returned
    /// [`Job`] is a snapshot; [`JobSession::job`] follows later states.
    ///
    /// # Errors
    /// * [`LaunchError::EmptyRequest`] - blank text, nothing was sent
    /// * [`SubmitError::JobInProgress`] - the previous job has not finished
    /// * [`SubmitError::Transport`] / [`SubmitError::MissingJobId`] - creation failed
    pub async fn launch(&mut self, text: &str) -> Result<Job, LaunchError> {
        let request = GenerationRequest::new(text, self.recursion_limit)?;

        if let Some(job_id) = self.current_job() {
            debug!("Refusing new submission while job {} is running", job_id);
            return Err(SubmitError::JobInProgress(job_id.clone()).into());
        }

        // Anything still queued belongs to the previous job
        if let Some(previous) = self.active.take() {
            self.poller.stop(&previous);
        }
        self.job = None;
        self.state = None;
        self.local.clear();

        let job = self.submitter.submit(&request).await?;
        self.local.push_back(JobState::Submitting);

        self.active = Some(self.poller.start(job.id.clone(), self.updates_tx.clone()));
        self.job = Some(job.clone());
        Ok(job)
    }

    /// Waits for the next state of the current job
    ///
    /// Returns `None` once nothing more can arrive: no job was launched, the
    /// job reached a terminal state, or it was cancelled.
    pub async fn next_state(&mut self) -> Option<JobState> {
        loop {
            if let Some(state) = self.try_next_state() {
                return Some(state);
            }
            // A poll task sends its last state before it finishes
            let polling = self.active.as_ref().is_some_and(|h| !h.is_finished());
            if !polling {
                return None;
            }

            // The session holds a sender, so the channel never closes
            let update = self.updates_rx.recv().await?;
            if let Some(state) = self.accept(update) {
                return Some(state);
            }
        }
    }

    /// Returns the next state of the current job if one is already queued
    pub fn try_next_state(&mut self) -> Option<JobState> {
        if let Some(state) = self.local.pop_front() {
            self.state = Some(state.clone());
            return Some(state);
        }

        while let Ok(update) = self.updates_rx.try_recv() {
            if let Some(state) = self.accept(update) {
                return Some(state);
            }
        }
        None
    }

    /// Stops tracking the current job, if any
    ///
    /// Safe to call repeatedly and after the job finished on its own.
    /// States of the cancelled job that were not read yet are discarded.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            if handle.is_active() {
                info!("Cancelling poll for job {}", handle.job_id());
            }
            self.poller.stop(&handle);
        }
        self.job = None;
        self.local.clear();
    }

    /// The job still being polled, if any
    pub fn current_job(&self) -> Option<&JobId> {
        self.active
            .as_ref()
            .filter(|handle| handle.is_active())
            .map(PollHandle::job_id)
    }

    /// The tracked job, its `state` being the last one handed out
    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    /// Last state handed out by [`JobSession::next_state`]
    pub fn current_state(&self) -> Option<&JobState> {
        self.state.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.current_job().is_some()
    }

    fn accept(&mut self, update: StateUpdate) -> Option<JobState> {
        let Some(job) = self.job.as_mut().filter(|job| job.id == update.job_id) else {
            debug!(
                "Discarding {} state of job {}",
                update.state.label(),
                update.job_id
            );
            return None;
        };

        job.state = update.state.clone();
        self.state = Some(update.state.clone());
        Some(update.state)
    }
}
