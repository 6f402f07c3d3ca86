//! Job-related API endpoints

use crate::GenerationClient;
use crate::error::Result;
use appforge_core::domain::job::JobId;
use appforge_core::dto::job::{CreateJob, JobCreated, JobStatusResponse};

impl GenerationClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Ask the service to start a new generation job
    ///
    /// # Arguments
    /// * `req` - The job creation request
    ///
    /// # Returns
    /// The raw creation response; the job id may be missing if the service
    /// misbehaves, which callers must check
    ///
    /// # Example
    /// ```no_run
    /// # use appforge_client::GenerationClient;
    /// # use appforge_core::dto::job::CreateJob;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GenerationClient::new("http://127.0.0.1:8000");
    /// let created = client.create_job(&CreateJob {
    ///     prompt: "build a todo app".to_string(),
    ///     recursion_limit: 100,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_job(&self, req: &CreateJob) -> Result<JobCreated> {
        let url = format!("{}/generate", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    pub async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse> {
        let url = format!("{}/status/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Results
    // =============================================================================

    /// Address of the generated artifact for a job
    ///
    /// Only meaningful once the job is done. Building the address performs
    /// no network call.
    pub fn result_url(&self, job_id: &JobId) -> String {
        format!("{}/download/{}", self.base_url, job_id)
    }

    /// Download the generated artifact (a zip archive)
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    pub async fn download_result(&self, job_id: &JobId) -> Result<Vec<u8>> {
        let response = self.client.get(self.result_url(job_id)).send().await?;

        self.handle_bytes(response).await
    }
}
