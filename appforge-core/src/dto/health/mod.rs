//! Health check DTOs

use serde::{Deserialize, Serialize};

/// Body returned by the service root endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}
