//! Transport boundary
//!
//! The lifecycle components only talk to the generation service through
//! [`JobTransport`]. [`GenerationClient`] is the HTTP implementation; tests
//! plug in scripted fakes.

use appforge_core::domain::job::JobId;
use appforge_core::dto::job::{CreateJob, JobCreated, JobStatusResponse};
use async_trait::async_trait;

use crate::GenerationClient;
use crate::error::Result;

/// Calls the job lifecycle needs from the generation service
#[async_trait]
pub trait JobTransport: Send + Sync + 'static {
    /// Creates a job; one call per submission
    async fn create_job(&self, req: &CreateJob) -> Result<JobCreated>;

    /// Queries the status of a job
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse>;

    /// Address of the artifact of a finished job, without fetching it
    fn result_url(&self, job_id: &JobId) -> String;
}

#[async_trait]
impl JobTransport for GenerationClient {
    async fn create_job(&self, req: &CreateJob) -> Result<JobCreated> {
        GenerationClient::create_job(self, req).await
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse> {
        GenerationClient::job_status(self, job_id).await
    }

    fn result_url(&self, job_id: &JobId) -> String {
        GenerationClient::result_url(self, job_id)
    }
}
