//! Resolved runtime state shared by commands.

use crate::config::{Config, DataPaths};
use crate::error::{CliError, Result};
use bom_acquire::{AcquisitionPipeline, ArtifactStore, CandidateSearch};
use bom_generator::{Credentials, PromptFile, QueryGenerator, YOUTUBE_API_KEY};
use bom_provenance::ProvenanceLog;
use bom_providers::{OpenAiProvider, YouTubeSearch, YtDlpFetcher};
use std::path::Path;

/// Configuration, data locations and credentials for one invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Loaded configuration
    pub config: Config,
    /// Data locations
    pub paths: DataPaths,
    /// Provider credentials
    pub credentials: Credentials,
}

impl AppContext {
    /// Resolve data paths and credentials for `config`.
    pub fn new(config: Config, data_dir: Option<&Path>, env_file: Option<&Path>) -> Result<Self> {
        let paths = config.data_paths(data_dir)?;
        let credentials = Credentials::from_env(Some(env_file.unwrap_or(Path::new(".env"))))?;
        Ok(Self {
            config,
            paths,
            credentials,
        })
    }

    /// The provenance log.
    pub fn log(&self) -> ProvenanceLog {
        ProvenanceLog::new(&self.paths.log)
    }

    /// The prompt file.
    pub fn prompt_file(&self) -> PromptFile {
        PromptFile::new(&self.paths.prompt)
    }

    /// The artifact store.
    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(&self.paths.audio)
    }

    /// Model to use, preferring an explicit choice.
    pub fn model(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_model.clone())
    }

    /// Query generator backed by the OpenAI Responses API.
    pub fn generator(&self) -> Result<QueryGenerator<OpenAiProvider>> {
        let provider = OpenAiProvider::with_timeout(
            &self.config.providers.openai_base_url,
            self.config.generator.generation_timeout(),
        )
        .map_err(|e| CliError::Provider(e.to_string()))?;

        Ok(QueryGenerator::new(
            provider,
            self.log(),
            self.prompt_file(),
            self.credentials.clone(),
            self.config.generator.clone(),
        ))
    }

    /// Candidate search backed by the YouTube Data API.
    pub fn search(&self) -> Result<CandidateSearch<YouTubeSearch>> {
        let api_key = self
            .credentials
            .youtube_api_key()
            .ok_or_else(|| CliError::Config(format!("{} is not set", YOUTUBE_API_KEY)))?;
        let provider = YouTubeSearch::with_base_url(&self.config.providers.youtube_base_url, api_key)
            .map_err(|e| CliError::Provider(e.to_string()))?;
        Ok(CandidateSearch::new(provider, self.config.acquire.clone()))
    }

    /// Acquisition pipeline backed by `yt-dlp`.
    pub fn pipeline(&self) -> AcquisitionPipeline<YtDlpFetcher> {
        let fetcher = YtDlpFetcher::new(&self.config.providers.ytdlp_binary)
            .with_format(self.config.providers.ytdlp_format.clone());
        AcquisitionPipeline::new(fetcher, self.config.acquire.clone())
    }

    /// Candidate limit, preferring an explicit choice.
    pub fn candidate_limit(&self, explicit: Option<usize>) -> usize {
        explicit.unwrap_or(self.config.acquire.candidate_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_generator::OPENAI_API_KEY;

    fn context(credentials: Credentials) -> AppContext {
        AppContext {
            config: Config::default(),
            paths: DataPaths::new("/tmp/bom-test"),
            credentials,
        }
    }

    #[test]
    fn test_search_requires_key() {
        let ctx = context(Credentials::default().with(OPENAI_API_KEY, "k"));
        assert!(matches!(ctx.search(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_search_with_key() {
        let ctx = context(Credentials::default().with(YOUTUBE_API_KEY, "k"));
        assert!(ctx.search().is_ok());
    }

    #[test]
    fn test_model_and_limit_defaults() {
        let ctx = context(Credentials::default());
        assert_eq!(ctx.model(None), ctx.config.default_model);
        assert_eq!(ctx.model(Some("other")), "other");
        assert_eq!(ctx.candidate_limit(None), ctx.config.acquire.candidate_limit);
        assert_eq!(ctx.candidate_limit(Some(9)), 9);
    }

    #[test]
    fn test_paths() {
        let ctx = context(Credentials::default());
        assert_eq!(ctx.log().path(), Path::new("/tmp/bom-test/openai_responses.jsonl"));
        assert_eq!(ctx.artifacts().dir(), Path::new("/tmp/bom-test/audio"));
    }
}
