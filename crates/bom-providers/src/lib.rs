//! Bom Provider Layer
//!
//! Implementations of the capability traits from `bom-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic text generation for testing
//! - `OpenAiProvider`: OpenAI Responses API (optionally with a hosted prompt)
//! - `YouTubeSearch`: YouTube Data API v3 search with page tokens
//! - `YtDlpFetcher`: media bytes and info-dict metadata via the `yt-dlp` tool
//! - `MockSearch` / `MockFetcher`: scripted search pages and fetch outcomes
//!
//! # Examples
//!
//! ```
//! use bom_providers::MockProvider;
//! use bom_domain::{GenerationRequest, TextGenerator};
//!
//! let provider = MockProvider::new("gunshot echo canyon");
//! let request = GenerationRequest {
//!     model: "test".to_string(),
//!     api_key: "key".to_string(),
//!     prompt: None,
//!     input: "prompt".to_string(),
//! };
//! assert_eq!(provider.generate(&request).unwrap(), "gunshot echo canyon");
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod openai;
pub mod youtube;
pub mod ytdlp;

use bom_domain::{GenerationRequest, TextGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use mock::{wav_bytes, MockFetcher, MockSearch};
pub use openai::OpenAiProvider;
pub use youtube::YouTubeSearch;
pub use ytdlp::YtDlpFetcher;

/// Errors that can occur during text generation
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Errors that can occur while querying a search source
#[derive(Error, Debug)]
pub enum SearchProviderError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credential rejected or quota exhausted
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur while fetching media
#[derive(Error, Debug)]
pub enum FetchError {
    /// The downloader executable could not be started
    #[error("Downloader not available: {0}")]
    ToolMissing(String),

    /// The downloader exited unsuccessfully
    #[error("Downloader failed ({status}): {stderr}")]
    Failed {
        /// Exit status description
        status: String,
        /// Tail of the downloader's stderr
        stderr: String,
    },

    /// The downloader was killed at the fetch deadline
    #[error("Downloader timed out after {0}s")]
    TimedOut(u64),

    /// Metadata output could not be decoded
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Media is not available from this source
    #[error("Media unavailable: {0}")]
    Unavailable(String),
}

/// Mock text-generation provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls and
/// records every request it receives.
///
/// # Examples
///
/// ```
/// use bom_providers::MockProvider;
/// use bom_domain::{GenerationRequest, TextGenerator};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
///
/// let request = GenerationRequest {
///     model: "m".to_string(),
///     api_key: "k".to_string(),
///     prompt: None,
///     input: "prompt1".to_string(),
/// };
/// assert_eq!(provider.generate(&request).unwrap(), "response1");
/// assert_eq!(provider.requests()[0].input, "prompt1");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Option<String>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all inputs
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given input
    pub fn add_response(&mut self, input: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(input.into(), Some(response.into()));
    }

    /// Configure to return an error for a specific input
    pub fn add_error(&mut self, input: impl Into<String>) {
        self.responses.lock().unwrap().insert(input.into(), None);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        match responses.get(&request.input) {
            Some(Some(response)) => Ok(response.clone()),
            Some(None) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}
