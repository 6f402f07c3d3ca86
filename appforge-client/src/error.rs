//! Error types for the AppForge client

use appforge_core::domain::job::JobId;
use appforge_core::domain::request::EmptyRequest;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the generation service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the service refused the call because of rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::ApiError { status: 429, .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

/// Errors from the job-creation boundary
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The service could not be reached or rejected the call
    #[error("failed to start job: {0}")]
    Transport(#[from] ClientError),

    /// The service answered but did not hand out a job id
    #[error("service response did not contain a job id")]
    MissingJobId,

    /// Another job is still being tracked by this session
    #[error("job {0} is still in progress")]
    JobInProgress(JobId),
}

/// Everything that can prevent a job from being launched
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    EmptyRequest(#[from] EmptyRequest),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}
