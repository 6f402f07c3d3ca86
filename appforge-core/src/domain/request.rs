//! Generation request domain type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recursion limit the client sends with every request
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Raised locally when the prompt is blank; no network call is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request text is empty")]
pub struct EmptyRequest;

/// A validated request for the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    prompt: String,
    recursion_limit: u32,
}

impl GenerationRequest {
    /// Builds a request from user text, trimming it first
    ///
    /// # Errors
    /// Returns [`EmptyRequest`] when the text is empty after trimming.
    pub fn new(text: &str, recursion_limit: u32) -> Result<Self, EmptyRequest> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(EmptyRequest);
        }

        Ok(Self {
            prompt: prompt.to_string(),
            recursion_limit,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_trimmed() {
        let req = GenerationRequest::new("  build a todo app \n", DEFAULT_RECURSION_LIMIT).unwrap();
        assert_eq!(req.prompt(), "build a todo app");
        assert_eq!(req.recursion_limit(), 100);
    }

    #[test]
    fn test_blank_request_is_rejected() {
        assert_eq!(GenerationRequest::new("", 100), Err(EmptyRequest));
        assert_eq!(GenerationRequest::new(" \t\n ", 100), Err(EmptyRequest));
    }
}
