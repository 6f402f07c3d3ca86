//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status string the service reports once the artifact is ready
pub const STATUS_DONE: &str = "DONE";

/// Status string the service reports when generation failed
pub const STATUS_FAILED: &str = "FAILED";

/// Opaque job identifier assigned by the generation service
///
/// Only the service knows its structure; the client treats it as a key for
/// the status and download endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wraps a service-provided identifier, rejecting blank values
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submitted generation job
///
/// Lives only as long as the client tracks it; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl Job {
    /// Creates a freshly submitted job, waiting for its first status report
    pub fn submitted(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Pending { status: None },
            submitted_at: chrono::Utc::now(),
        }
    }
}

/// Client-side lifecycle state of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// The creation request is on its way
    Submitting,
    /// The service accepted the job and reports it as in progress
    Pending {
        /// Raw progress text from the service, if it sent one
        status: Option<String>,
    },
    /// The last status query failed; polling continues
    ConnectionLost,
    /// The artifact is ready at `result_url`
    Done { result_url: String },
    /// The service reported that generation failed
    Failed,
    /// Polling gave up after the configured number of status queries
    Abandoned { attempts: u32 },
}

impl JobState {
    /// Terminal states never transition again and end polling
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Done { .. } | JobState::Failed | JobState::Abandoned { .. }
        )
    }

    /// Short label, mostly for logs
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Submitting => "submitting",
            JobState::Pending { .. } => "pending",
            JobState::ConnectionLost => "connection-lost",
            JobState::Done { .. } => "done",
            JobState::Failed => "failed",
            JobState::Abandoned { .. } => "abandoned",
        }
    }
}

/// Interpretation of the status text returned by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Done,
    Failed,
    /// Anything the client does not recognise, including a missing field
    InProgress(Option<String>),
}

impl RemoteStatus {
    /// Maps the raw `status` field. Matching is exact and case-sensitive.
    pub fn from_wire(status: Option<&str>) -> Self {
        match status {
            Some(STATUS_DONE) => RemoteStatus::Done,
            Some(STATUS_FAILED) => RemoteStatus::Failed,
            Some(text) if !text.trim().is_empty() => RemoteStatus::InProgress(Some(text.to_string())),
            _ => RemoteStatus::InProgress(None),
        }
    }

    /// Converts into a lifecycle state; `result_url` is only used for `Done`
    pub fn into_state(self, result_url: impl FnOnce() -> String) -> JobState {
        match self {
            RemoteStatus::Done => JobState::Done {
                result_url: result_url(),
            },
            RemoteStatus::Failed => JobState::Failed,
            RemoteStatus::InProgress(status) => JobState::Pending { status },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_rejects_blank() {
        assert!(JobId::parse("").is_none());
        assert!(JobId::parse("   ").is_none());
        assert_eq!(JobId::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_job_id_serializes_as_plain_string() {
        let id = JobId::parse("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_remote_status_recognises_terminal_values() {
        assert_eq!(RemoteStatus::from_wire(Some("DONE")), RemoteStatus::Done);
        assert_eq!(RemoteStatus::from_wire(Some("FAILED")), RemoteStatus::Failed);
    }

    #[test]
    fn test_remote_status_is_case_sensitive() {
        assert_eq!(
            RemoteStatus::from_wire(Some("done")),
            RemoteStatus::InProgress(Some("done".to_string()))
        );
    }

    #[test]
    fn test_remote_status_unknown_or_missing_is_in_progress() {
        assert_eq!(
            RemoteStatus::from_wire(Some("Coding step 2 / 5")),
            RemoteStatus::InProgress(Some("Coding step 2 / 5".to_string()))
        );
        assert_eq!(RemoteStatus::from_wire(None), RemoteStatus::InProgress(None));
        assert_eq!(RemoteStatus::from_wire(Some("")), RemoteStatus::InProgress(None));
    }

    #[test]
    fn test_into_state_only_builds_url_for_done() {
        let state = RemoteStatus::InProgress(None).into_state(|| panic!("url not needed"));
        assert_eq!(state, JobState::Pending { status: None });

        let state = RemoteStatus::Done.into_state(|| "http://svc/download/abc".to_string());
        assert_eq!(
            state,
            JobState::Done {
                result_url: "http://svc/download/abc".to_string()
            }
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Abandoned { attempts: 3 }.is_terminal());
        assert!(
            JobState::Done {
                result_url: String::new()
            }
            .is_terminal()
        );
        assert!(!JobState::Submitting.is_terminal());
        assert!(!JobState::ConnectionLost.is_terminal());
        assert!(!JobState::Pending { status: None }.is_terminal());
    }
}
