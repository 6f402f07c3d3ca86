//! Service health endpoint

use crate::GenerationClient;
use crate::error::Result;
use appforge_core::dto::health::HealthResponse;

impl GenerationClient {
    /// Check that the service is up
    ///
    /// # Returns
    /// The greeting message the service answers with
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
