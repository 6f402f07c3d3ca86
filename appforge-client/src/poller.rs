//! Job status poller
//!
//! Polls the service for the status of a single job until it reaches a
//! terminal state or the poll is stopped. The loop re-arms only after the
//! previous status query resolved, so at most one query is in flight and
//! emitted states are totally ordered.

use appforge_core::domain::job::{JobId, JobState, RemoteStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::transport::JobTransport;

/// Default delay between two status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between a response and the next query
    pub interval: Duration,
    /// Give up after this many status queries. `None` polls until the job
    /// reaches a terminal state.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// A state observed for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub job_id: JobId,
    pub state: JobState,
}

/// Ownership token for a running poll
///
/// Dropping the handle stops the poll.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Whether the poll may still query the service or emit a state
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }

    /// Whether the poll task has exited, after sending its last state
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Starts and stops status polls
pub struct Poller<T> {
    transport: Arc<T>,
    config: PollConfig,
}

impl<T: JobTransport> Poller<T> {
    pub fn new(transport: Arc<T>, config: PollConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Starts polling `job_id`, sending every observed state to `events`
    /// tagged with the job it belongs to
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, job_id: JobId, events: UnboundedSender<StateUpdate>) -> PollHandle {
        let token = CancellationToken::new();

        info!(
            "Polling job {} every {:?} (max attempts: {:?})",
            job_id, self.config.interval, self.config.max_attempts
        );

        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.transport),
            job_id.clone(),
            self.config,
            token.clone(),
            events,
        ));

        PollHandle {
            job_id,
            token,
            task,
        }
    }

    /// Stops a poll. Calling it again, or after the job finished, does nothing.
    pub fn stop(&self, handle: &PollHandle) {
        if !handle.token.is_cancelled() {
            debug!("Stopping poll for job {}", handle.job_id);
            handle.token.cancel();
        }
    }
}

async fn poll_loop<T: JobTransport>(
    transport: Arc<T>,
    job_id: JobId,
    config: PollConfig,
    token: CancellationToken,
    events: UnboundedSender<StateUpdate>,
) {
    let update = |state: JobState| StateUpdate {
        job_id: job_id.clone(),
        state,
    };

    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(config.interval) => {}
        }

        attempts += 1;
        debug!("Querying status of job {} (attempt {})", job_id, attempts);

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            outcome = transport.job_status(&job_id) => outcome,
        };

        // A response that lands after stop() must not be reported
        if token.is_cancelled() {
            return;
        }

        let state = match outcome {
            Ok(response) => RemoteStatus::from_wire(response.status.as_deref())
                .into_state(|| transport.result_url(&job_id)),
            Err(e) => {
                warn!("Lost connection while polling job {}: {}", job_id, e);
                JobState::ConnectionLost
            }
        };

        // Release the handle before the terminal state becomes observable
        let terminal = state.is_terminal();
        if terminal {
            info!("Job {} finished: {}", job_id, state.label());
            token.cancel();
        }

        if events.send(update(state)).is_err() {
            debug!("State receiver for job {} dropped, stopping poll", job_id);
            token.cancel();
            return;
        }

        if terminal {
            return;
        }

        if config.max_attempts.is_some_and(|max| attempts >= max) {
            warn!("Giving up on job {} after {} status queries", job_id, attempts);
            token.cancel();
            let _ = events.send(update(JobState::Abandoned { attempts }));
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use appforge_core::dto::job::{CreateJob, JobCreated, JobStatusResponse};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    /// Answers status queries from a script; once exhausted it keeps
    /// reporting the job as running
    struct ScriptedStatus {
        script: Mutex<VecDeque<Result<JobStatusResponse>>>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedStatus {
        fn new(script: Vec<Result<JobStatusResponse>>) -> Arc<Self> {
            Self::with_delay(script, Duration::ZERO)
        }

        fn with_delay(script: Vec<Result<JobStatusResponse>>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobTransport for ScriptedStatus {
        async fn create_job(&self, _req: &CreateJob) -> Result<JobCreated> {
            panic!("poller must not create jobs");
        }

        async fn job_status(&self, _job_id: &JobId) -> Result<JobStatusResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(JobStatusResponse::with_status("RUNNING")))
        }

        fn result_url(&self, job_id: &JobId) -> String {
            format!("mem://download/{}", job_id)
        }
    }

    fn job_id() -> JobId {
        JobId::parse("abc").unwrap()
    }

    async fn collect_until_terminal(rx: &mut mpsc::UnboundedReceiver<StateUpdate>) -> Vec<JobState> {
        let mut seen = Vec::new();
        while let Some(StateUpdate { job_id: id, state }) = rx.recv().await {
            assert_eq!(id, job_id());
            let terminal = state.is_terminal();
            seen.push(state);
            if terminal {
                break;
            }
        }
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_done() {
        let transport = ScriptedStatus::new(vec![
            Ok(JobStatusResponse::with_status("Planning")),
            Ok(JobStatusResponse::with_status("DONE")),
        ]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);
        let states = collect_until_terminal(&mut rx).await;

        assert_eq!(
            states,
            vec![
                JobState::Pending {
                    status: Some("Planning".to_string())
                },
                JobState::Done {
                    result_url: "mem://download/abc".to_string()
                },
            ]
        );

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.calls(), 2);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_query_waits_one_interval() {
        let transport = ScriptedStatus::new(vec![]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let _handle = poller.start(job_id(), tx);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(transport.calls(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_status_is_pending() {
        let transport = ScriptedStatus::new(vec![
            Ok(JobStatusResponse::default()),
            Ok(JobStatusResponse::with_status("FAILED")),
        ]);
        let poller = Poller::new(transport, PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = poller.start(job_id(), tx);
        let states = collect_until_terminal(&mut rx).await;

        assert_eq!(
            states,
            vec![JobState::Pending { status: None }, JobState::Failed]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_keeps_polling() {
        let transport = ScriptedStatus::new(vec![
            Err(ClientError::api_error(503, "unavailable")),
            Err(ClientError::ParseError("garbage".to_string())),
            Ok(JobStatusResponse::with_status("DONE")),
        ]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = poller.start(job_id(), tx);
        let states = collect_until_terminal(&mut rx).await;

        assert_eq!(states[0], JobState::ConnectionLost);
        assert_eq!(states[1], JobState::ConnectionLost);
        assert!(matches!(states[2], JobState::Done { .. }));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let transport = ScriptedStatus::new(vec![]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);
        assert_eq!(
            rx.recv().await.map(|update| update.state),
            Some(JobState::Pending {
                status: Some("RUNNING".to_string())
            })
        );

        poller.stop(&handle);
        poller.stop(&handle);
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.calls(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_terminal_is_noop() {
        let transport = ScriptedStatus::new(vec![Ok(JobStatusResponse::with_status("FAILED"))]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);
        assert_eq!(
            rx.recv().await,
            Some(StateUpdate {
                job_id: job_id(),
                state: JobState::Failed
            })
        );

        poller.stop(&handle);
        poller.stop(&handle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.calls(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_stop_is_discarded() {
        let transport = ScriptedStatus::with_delay(
            vec![Ok(JobStatusResponse::with_status("DONE"))],
            Duration::from_secs(5),
        );
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);

        // The query is dispatched at 2s and would resolve at 7s
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(transport.calls(), 1);
        poller.stop(&handle);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_queries_never_overlap() {
        let transport = ScriptedStatus::with_delay(vec![], Duration::from_secs(5));
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let _handle = poller.start(job_id(), tx);

        // Queries start at 2s, 9s, 16s: interval plus query time
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(transport.calls(), 2);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(transport.calls(), 2);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_abandons_job() {
        let transport = ScriptedStatus::new(vec![]);
        let config = PollConfig {
            max_attempts: Some(3),
            ..PollConfig::default()
        };
        let poller = Poller::new(Arc::clone(&transport), config);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);
        let states = collect_until_terminal(&mut rx).await;

        assert_eq!(states.len(), 4);
        assert_eq!(states[3], JobState::Abandoned { attempts: 3 });

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.calls(), 3);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_poll() {
        let transport = ScriptedStatus::new(vec![]);
        let poller = Poller::new(Arc::clone(&transport), PollConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let handle = poller.start(job_id(), tx);
        drop(handle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.calls(), 0);
    }
}
