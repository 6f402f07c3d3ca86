//! Presentation mapping
//!
//! Turns lifecycle states and launch errors into what the user sees. The
//! mapping is pure; concrete presenters only decide how to draw a [`View`].

use appforge_core::domain::job::JobState;

use crate::error::{LaunchError, SubmitError};

/// Fallback shown while the service has not reported any progress text
pub const STARTING_FALLBACK: &str = "Starting...";

/// Visual weight of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Working,
    Warning,
    Success,
    Error,
}

/// Everything a user interface needs to render one moment of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status_line: String,
    pub tone: Tone,
    /// Whether the user may submit a new request
    pub submit_enabled: bool,
    /// Address of the finished artifact, once there is one
    pub result_link: Option<String>,
}

impl View {
    fn new(status_line: impl Into<String>, tone: Tone, submit_enabled: bool) -> Self {
        Self {
            status_line: status_line.into(),
            tone,
            submit_enabled,
            result_link: None,
        }
    }

    /// View for a lifecycle state
    pub fn for_state(state: &JobState) -> Self {
        match state {
            JobState::Submitting => View::new("Starting job...", Tone::Working, false),
            JobState::Pending { status } => View::new(
                status.as_deref().unwrap_or(STARTING_FALLBACK),
                Tone::Working,
                false,
            ),
            // The job may still finish remotely, so input stays locked
            JobState::ConnectionLost => View::new("Lost connection...", Tone::Warning, false),
            JobState::Done { result_url } => View {
                result_link: Some(result_url.clone()),
                ..View::new("Project ready!", Tone::Success, true)
            },
            JobState::Failed => View::new("Generation failed.", Tone::Error, true),
            JobState::Abandoned { attempts } => View::new(
                format!("Gave up waiting after {} status checks.", attempts),
                Tone::Error,
                true,
            ),
        }
    }

    /// View for an error that kept a job from starting
    pub fn for_error(error: &LaunchError) -> Self {
        match error {
            LaunchError::EmptyRequest(_) => {
                View::new("Please enter a project description.", Tone::Warning, true)
            }
            LaunchError::Submit(SubmitError::Transport(e)) if e.is_rate_limited() => View::new(
                "Service is rate limited, try again later.",
                Tone::Error,
                true,
            ),
            LaunchError::Submit(SubmitError::Transport(_)) => {
                View::new("Error starting job.", Tone::Error, true)
            }
            LaunchError::Submit(SubmitError::MissingJobId) => {
                View::new("Service did not return a job id.", Tone::Error, true)
            }
            // The running job still owns the input
            LaunchError::Submit(SubmitError::JobInProgress(_)) => {
                View::new("A job is already running.", Tone::Warning, false)
            }
        }
    }
}

/// Consumer of lifecycle transitions
pub trait Presenter {
    /// Called once per emitted state, in emission order
    fn on_state_change(&mut self, state: &JobState);

    /// Called when a launch fails before any job exists
    fn on_error(&mut self, error: &LaunchError);
}
