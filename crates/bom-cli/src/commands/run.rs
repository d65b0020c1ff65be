//! Run command implementation: generate queries, then acquire a sample for each.

use crate::cli::RunArgs;
use crate::commands::acquire::acquire_query;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::{Formatter, QueryOutcome};
use bom_acquire::{AcquisitionPipeline, ArtifactStore, CandidateSearch};
use bom_domain::{MediaFetcher, QueryBatch, SearchProvider, TextGenerator};
use bom_generator::QueryGenerator;
use tracing::{info, warn};

/// Options for a single generate-and-acquire pass.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Model requested from the text generator
    pub model: String,
    /// Feed recent queries back into the prompt as dedup context
    pub include_previous: bool,
    /// Candidates tried per query
    pub limit: usize,
    /// Only the first N queries are processed when set
    pub max_queries: Option<usize>,
}

/// Execute the run command.
pub async fn execute_run(args: RunArgs, ctx: &AppContext, formatter: &Formatter) -> Result<()> {
    // Fail on a missing search key before spending a generation call
    let search = ctx.search()?;
    let generator = ctx.generator()?;
    let pipeline = ctx.pipeline();
    let store = ctx.artifacts();

    let options = RunOptions {
        model: ctx.model(args.model.as_deref()),
        include_previous: !args.no_previous,
        limit: ctx.candidate_limit(args.limit),
        max_queries: args.max_queries,
    };

    let (batch, outcomes) = run_pass(&generator, &search, &pipeline, &store, &options).await?;
    println!("{}", formatter.format_run(&batch, &outcomes)?);
    Ok(())
}

/// Generate one batch and try to acquire a sample for each query.
///
/// Generation errors abort the pass. A query that yields no sample is
/// reported as [`QueryOutcome::Failed`] and the pass moves on.
pub async fn run_pass<L, S, F>(
    generator: &QueryGenerator<L>,
    search: &CandidateSearch<S>,
    pipeline: &AcquisitionPipeline<F>,
    store: &ArtifactStore,
    options: &RunOptions,
) -> Result<(QueryBatch, Vec<QueryOutcome>)>
where
    L: TextGenerator + Send + Sync + 'static,
    L::Error: std::fmt::Display,
    S: SearchProvider + Send + Sync + 'static,
    S::Error: std::fmt::Display,
    F: MediaFetcher + Send + Sync + 'static,
    F::Error: std::fmt::Display,
{
    let generation = generator
        .generate(&options.model, options.include_previous)
        .await?;
    let batch = generation.batch;

    let take = options.max_queries.unwrap_or(batch.queries.len());
    let mut outcomes = Vec::new();
    for query in batch.queries.iter().take(take) {
        match acquire_query(search, pipeline, store, query, options.limit).await {
            Ok((_, paths)) => {
                info!("Saved sample for '{}' to {}", query, paths.media.display());
                outcomes.push(QueryOutcome::Acquired {
                    query: query.clone(),
                    media: paths.media.display().to_string(),
                });
            }
            Err(e) => {
                warn!("No sample for '{}': {}", query, e);
                outcomes.push(QueryOutcome::Failed {
                    query: query.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok((batch, outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use bom_acquire::AcquireConfig;
    use bom_generator::{Credentials, GeneratorConfig, PromptFile, OPENAI_API_KEY};
    use bom_provenance::ProvenanceLog;
    use bom_providers::{MockFetcher, MockProvider, MockSearch};
    use tempfile::TempDir;

    fn generator(dir: &TempDir, provider: MockProvider) -> QueryGenerator<MockProvider> {
        QueryGenerator::new(
            provider,
            ProvenanceLog::new(dir.path().join("openai_responses.jsonl")),
            PromptFile::new(dir.path().join("prompt.txt")),
            Credentials::default().with(OPENAI_API_KEY, "sk-test"),
            GeneratorConfig::default(),
        )
    }

    fn options(max_queries: Option<usize>) -> RunOptions {
        RunOptions {
            model: "gpt-4.1-mini".to_string(),
            include_previous: true,
            limit: 5,
            max_queries,
        }
    }

    #[tokio::test]
    async fn test_run_acquires_each_query() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir, MockProvider::new("rifle shot\nshotgun blast"));
        let search = CandidateSearch::new(
            MockSearch::single_page(&[("clip", "u1")]),
            AcquireConfig::default(),
        );
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new().with_audio("u1", "clip1"),
            AcquireConfig::default(),
        );
        let store = ArtifactStore::new(dir.path().join("audio"));

        let (batch, outcomes) = run_pass(&generator, &search, &pipeline, &store, &options(None))
            .await
            .unwrap();

        assert_eq!(batch.queries, vec!["rifle shot", "shotgun blast"]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, QueryOutcome::Acquired { .. })));
        assert_eq!(generator.log().read_all().unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_run_reports_failures_without_aborting() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir, MockProvider::new("rifle shot\nshotgun blast"));
        let search = CandidateSearch::new(
            MockSearch::single_page(&[("clip", "u1")]),
            AcquireConfig::default(),
        );
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new().with_failure("u1", "HTTP 403"),
            AcquireConfig::default(),
        );
        let store = ArtifactStore::new(dir.path().join("audio"));

        let (_, outcomes) = run_pass(&generator, &search, &pipeline, &store, &options(None))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0] {
            QueryOutcome::Failed { query, reason } => {
                assert_eq!(query, "rifle shot");
                assert!(reason.contains("failed"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_run_respects_max_queries() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir, MockProvider::new("one\ntwo\nthree"));
        let search = MockSearch::single_page(&[("clip", "u1")]);
        let fetcher = MockFetcher::new().with_audio("u1", "clip1");
        let candidate_search = CandidateSearch::new(search.clone(), AcquireConfig::default());
        let pipeline = AcquisitionPipeline::new(fetcher.clone(), AcquireConfig::default());
        let store = ArtifactStore::new(dir.path().join("audio"));

        let (batch, outcomes) = run_pass(
            &generator,
            &candidate_search,
            &pipeline,
            &store,
            &options(Some(1)),
        )
        .await
        .unwrap();

        assert_eq!(batch.queries.len(), 3);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(search.call_count(), 1);
        assert_eq!(fetcher.attempts(), vec!["u1"]);
    }

    #[tokio::test]
    async fn test_run_generation_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir, MockProvider::new("[]"));
        let search = MockSearch::single_page(&[("clip", "u1")]);
        let candidate_search = CandidateSearch::new(search.clone(), AcquireConfig::default());
        let pipeline = AcquisitionPipeline::new(MockFetcher::new(), AcquireConfig::default());
        let store = ArtifactStore::new(dir.path().join("audio"));

        let result = run_pass(
            &generator,
            &candidate_search,
            &pipeline,
            &store,
            &options(None),
        )
        .await;

        assert!(matches!(result, Err(CliError::Generator(_))));
        assert_eq!(search.call_count(), 0);
    }
}
