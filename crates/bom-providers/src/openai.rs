//! OpenAI Provider Implementation
//!
//! Talks to the OpenAI Responses API. When the request carries a hosted
//! prompt reference, the prompt id and version are forwarded so the template
//! stored on the provider side is applied to the input.
//!
//! The provider performs exactly one HTTP call per request. Retrying is the
//! caller's decision.
//!
//! # Examples
//!
//! ```no_run
//! use bom_providers::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("https://api.openai.com").unwrap();
//! ```

use crate::LlmError;
use bom_domain::{GenerationRequest, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default timeout for a single request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI Responses API provider
pub struct OpenAiProvider {
    base_url: String,
    client: reqwest::Client,
}

/// Request body for the Responses API
#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<PromptParam<'a>>,
}

#[derive(Serialize)]
struct PromptParam<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

/// Subset of the Responses API body we read
#[derive(Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    /// Concatenate every `output_text` part, preferring the convenience field
    fn text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

impl OpenAiProvider {
    /// Create a new provider for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new provider with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        // Each blocking call runs on its own short-lived runtime, so pooled
        // connections would outlive the runtime that owns them.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Generate text using the Responses API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API cannot be reached
    /// - The credential is rejected (`Authentication`)
    /// - The model is unknown (`ModelNotAvailable`)
    /// - The response body is not in the expected shape
    pub async fn generate_async(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/responses", self.base_url);

        let body = ResponsesRequest {
            model: &request.model,
            input: &request.input,
            prompt: request.prompt.as_ref().map(|p| PromptParam {
                id: &p.id,
                version: p.version.as_deref(),
            }),
        };

        debug!("POST {} (model {}, {} input chars)", url, request.model, request.input.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("HTTP {}", status))
                }
                reqwest::StatusCode::NOT_FOUND => {
                    LlmError::ModelNotAvailable(request.model.clone())
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let body: ResponsesBody = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.text())
    }
}

impl TextGenerator for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(self.generate_async(request))
    }
}
