//! Core Query Generator implementation

use crate::config::GeneratorConfig;
use crate::credentials::Credentials;
use crate::error::GeneratorError;
use crate::parser::{parse_queries, ParseStrategy};
use crate::prompt::{PromptBuilder, PromptFile};
use bom_domain::{GenerationRequest, PromptRef, QueryBatch, TextGenerator};
use bom_provenance::{seal_batch, ProvenanceLog};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Outcome of one successful generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// The batch as appended to the provenance log
    pub batch: QueryBatch,
    /// Strategy the parser used
    pub strategy: ParseStrategy,
}

/// Generates new search queries and records each batch in the provenance log
pub struct QueryGenerator<L>
where
    L: TextGenerator,
{
    provider: Arc<L>,
    log: ProvenanceLog,
    prompt_file: PromptFile,
    credentials: Credentials,
    config: GeneratorConfig,
}

impl<L> QueryGenerator<L>
where
    L: TextGenerator + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new QueryGenerator
    pub fn new(
        provider: L,
        log: ProvenanceLog,
        prompt_file: PromptFile,
        credentials: Credentials,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            log,
            prompt_file,
            credentials,
            config,
        }
    }

    /// The provenance log batches are appended to
    pub fn log(&self) -> &ProvenanceLog {
        &self.log
    }

    /// The active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one batch of queries
    ///
    /// Calls the provider exactly once. On success the batch is appended to
    /// the log before returning; on any failure nothing is appended.
    pub async fn generate(
        &self,
        model: &str,
        include_previous: bool,
    ) -> Result<Generation, GeneratorError> {
        let api_key = self.credentials.require_api_key()?.to_string();
        if model.trim().is_empty() {
            return Err(GeneratorError::Configuration(
                "model must not be empty".to_string(),
            ));
        }

        let hosted = self.credentials.hosted_prompt();
        let input = self.build_input(hosted.is_some(), include_previous)?;
        let prompt_ref = hosted.clone().unwrap_or_else(PromptRef::local);

        info!(
            "Generating queries with model '{}' (prompt '{}', {} input chars)",
            model,
            prompt_ref.id,
            input.len()
        );

        let request = GenerationRequest {
            model: model.to_string(),
            api_key,
            prompt: hosted,
            input,
        };

        let raw = timeout(self.config.generation_timeout(), self.call_provider(request.clone()))
            .await
            .map_err(|_| {
                GeneratorError::Provider(format!(
                    "no response within {}s",
                    self.config.generation_timeout_secs
                ))
            })??;

        if raw.trim().is_empty() {
            return Err(GeneratorError::Provider(
                "provider returned empty output".to_string(),
            ));
        }
        debug!("Provider response length: {} chars", raw.len());

        let parsed = parse_queries(&raw);
        if parsed.queries.is_empty() {
            return Err(GeneratorError::Provider(
                "provider output contained no queries".to_string(),
            ));
        }

        let batch = seal_batch(model, &prompt_ref, &request.input, &raw, parsed.queries);
        self.log.append(&batch)?;

        info!(
            "Logged {} queries ({:?}) to {}",
            batch.len(),
            parsed.strategy,
            self.log.path().display()
        );

        Ok(Generation {
            batch,
            strategy: parsed.strategy,
        })
    }

    /// Previously suggested queries, most recent first
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<String>, GeneratorError> {
        Ok(self.log.recent_queries(limit)?)
    }

    /// Input text for the next call
    fn build_input(&self, hosted: bool, include_previous: bool) -> Result<String, GeneratorError> {
        let mut builder = PromptBuilder::new();

        if !hosted || self.config.include_base_instructions {
            builder = builder.with_base_instructions(self.prompt_file.load()?);
        }

        if include_previous {
            let previous = match self.log.recent_queries(self.config.recent_limit) {
                Ok(previous) => previous,
                Err(e) => {
                    warn!("Could not read previous queries, continuing without them: {}", e);
                    Vec::new()
                }
            };
            debug!("Including {} previous queries", previous.len());
            builder = builder.with_previous(previous);
        }

        Ok(builder.build())
    }

    /// Call the provider on a blocking thread
    async fn call_provider(&self, request: GenerationRequest) -> Result<String, GeneratorError> {
        let provider = Arc::clone(&self.provider);

        tokio::task::spawn_blocking(move || {
            provider
                .generate(&request)
                .map_err(|e| GeneratorError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| GeneratorError::Provider(format!("Task join error: {}", e)))?
    }
}
