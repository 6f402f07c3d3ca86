//! Job DTOs for the generation service

use serde::{Deserialize, Serialize};

use crate::domain::request::GenerationRequest;

/// Body of the job-creation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub prompt: String,
    pub recursion_limit: u32,
}

impl From<&GenerationRequest> for CreateJob {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            prompt: req.prompt().to_string(),
            recursion_limit: req.recursion_limit(),
        }
    }
}

/// Response to the job-creation call
///
/// `job_id` is optional on the wire; its absence is a contract violation the
/// submitter reports separately from transport failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCreated {
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Response to a status query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl JobStatusResponse {
    /// Convenience constructor for a response carrying only a status
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            job_id: None,
            status: Some(status.into()),
        }
    }
}
