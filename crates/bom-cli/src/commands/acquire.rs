//! Acquire command implementation.

use crate::cli::AcquireArgs;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use bom_acquire::{
    AcquisitionPipeline, AcquisitionResult, ArtifactPaths, ArtifactStore, CandidateSearch,
};
use bom_domain::{MediaFetcher, SearchProvider};
use tracing::info;

/// Execute the acquire command.
pub async fn execute_acquire(
    args: AcquireArgs,
    ctx: &AppContext,
    formatter: &Formatter,
) -> Result<()> {
    let search = ctx.search()?;
    let pipeline = ctx.pipeline();
    let store = ctx.artifacts();

    match acquire_query(
        &search,
        &pipeline,
        &store,
        &args.query,
        ctx.candidate_limit(args.limit),
    )
    .await
    {
        Ok((result, paths)) => {
            println!("{}", formatter.format_acquisition(&result, &paths)?);
            Ok(())
        }
        Err(CliError::Exhausted(exhausted)) => {
            println!("{}", formatter.format_exhausted(&exhausted)?);
            Err(CliError::Exhausted(exhausted))
        }
        Err(e) => Err(e),
    }
}

/// Search for `query`, acquire the first usable candidate and persist it.
pub async fn acquire_query<S, F>(
    search: &CandidateSearch<S>,
    pipeline: &AcquisitionPipeline<F>,
    store: &ArtifactStore,
    query: &str,
    limit: usize,
) -> Result<(AcquisitionResult, ArtifactPaths)>
where
    S: SearchProvider + Send + Sync + 'static,
    S::Error: std::fmt::Display,
    F: MediaFetcher + Send + Sync + 'static,
    F::Error: std::fmt::Display,
{
    let candidates = search.search(query, limit).await?;
    info!("Trying {} candidates for '{}'", candidates.len(), query);

    let result = pipeline.acquire_first_success(&candidates).await?;
    let paths = store.persist(&result)?;
    Ok((result, paths))
}
