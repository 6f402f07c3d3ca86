//! Job submission
//!
//! Turns a validated request into exactly one job-creation call and checks
//! the service handed back a job id. Starting the poller is left to the
//! caller.

use appforge_core::domain::job::{Job, JobId};
use appforge_core::domain::request::GenerationRequest;
use appforge_core::dto::job::CreateJob;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::SubmitError;
use crate::transport::JobTransport;

/// Submits generation requests to the service
pub struct Submitter<T> {
    transport: Arc<T>,
}

impl<T: JobTransport> Submitter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Submits a request and returns the newly created job
    ///
    /// # Errors
    /// * [`SubmitError::Transport`] - the call failed or returned a non-2xx status
    /// * [`SubmitError::MissingJobId`] - the service answered without a job id
    pub async fn submit(&self, request: &GenerationRequest) -> Result<Job, SubmitError> {
        let created = self
            .transport
            .create_job(&CreateJob::from(request))
            .await
            .map_err(|e| {
                error!("Failed to reach generation service: {}", e);
                SubmitError::Transport(e)
            })?;

        let Some(id) = created.job_id.and_then(JobId::parse) else {
            error!("Generation service accepted the request but returned no job id");
            return Err(SubmitError::MissingJobId);
        };

        info!("Submitted job {}", id);
        Ok(Job::submitted(id))
    }
}
