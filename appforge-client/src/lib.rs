//! AppForge HTTP Client
//!
//! A type-safe client for the remote generation service, plus the
//! job-lifecycle machinery built on top of it: submitting a request,
//! polling the job until it reaches a terminal state, and mapping every
//! transition to something a user interface can render.
//!
//! # Example
//!
//! ```no_run
//! use appforge_client::{GenerationClient, JobSession, PollConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(GenerationClient::new("http://127.0.0.1:8000"));
//!     let mut session = JobSession::new(client, PollConfig::default(), 100);
//!
//!     let job = session.launch("build a todo app").await?;
//!     println!("Started job {}", job.id);
//!
//!     // Ends after the terminal state
//!     while let Some(state) = session.next_state().await {
//!         println!("{:?}", state);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod jobs;
pub mod poller;
pub mod presenter;
pub mod session;
pub mod submitter;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, LaunchError, Result, SubmitError};
pub use poller::{PollConfig, PollHandle, Poller, StateUpdate};
pub use presenter::{Presenter, Tone, View};
pub use session::JobSession;
pub use submitter::Submitter;
pub use transport::JobTransport;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the generation service API
///
/// Endpoints are grouped by concern:
/// - Job lifecycle (create, status, result address and download)
/// - Service health
#[derive(Debug, Clone)]
pub struct GenerationClient {
    /// Base URL of the service (e.g., "http://127.0.0.1:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl GenerationClient {
    /// Create a new generation service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://127.0.0.1:8000")
    ///
    /// # Example
    /// ```
    /// use appforge_client::GenerationClient;
    ///
    /// let client = GenerationClient::new("http://127.0.0.1:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use appforge_client::GenerationClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GenerationClient::with_client("http://127.0.0.1:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx statuses become [`ClientError::ApiError`] carrying the body
    /// text; a 2xx body that is not valid JSON becomes a parse error.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response carrying an opaque binary body
    async fn handle_bytes(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}
