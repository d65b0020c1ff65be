//! Ranked candidate search over a paginated source

use crate::config::AcquireConfig;
use crate::error::SearchError;
use bom_domain::{CandidateItem, SearchProvider};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collects ranked candidates for a query, following pagination as needed
pub struct CandidateSearch<S>
where
    S: SearchProvider,
{
    provider: Arc<S>,
    config: AcquireConfig,
}

impl<S> CandidateSearch<S>
where
    S: SearchProvider + Send + Sync + 'static,
    S::Error: std::fmt::Display,
{
    /// Create a new CandidateSearch
    pub fn new(provider: S, config: AcquireConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Up to `limit` candidates for `query` in the source's relevance order
    ///
    /// A blank query or a zero limit returns nothing without contacting the
    /// source. A failure on the first page is an error; a failure on a later
    /// page ends the search with what was already collected.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, SearchError> {
        let query = query.trim().to_string();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let provider = Arc::clone(&self.provider);
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || collect_candidates(&*provider, &config, &query, limit))
            .await
            .map_err(|e| SearchError::Unavailable(format!("Task join error: {}", e)))?
    }
}

/// Blocking pagination loop
fn collect_candidates<S>(
    provider: &S,
    config: &AcquireConfig,
    query: &str,
    limit: usize,
) -> Result<Vec<CandidateItem>, SearchError>
where
    S: SearchProvider,
    S::Error: std::fmt::Display,
{
    let mut candidates: Vec<CandidateItem> = Vec::new();
    let mut seen = HashSet::new();
    let mut page_token: Option<String> = None;

    for page_index in 0..config.max_pages {
        let remaining = limit - candidates.len();
        let page_size = remaining.min(config.page_size).max(1);

        let page = match provider.search_page(query, page_size, page_token.as_deref()) {
            Ok(page) => page,
            Err(e) if page_index == 0 => return Err(SearchError::Unavailable(e.to_string())),
            Err(e) => {
                warn!(
                    "Search page {} for '{}' failed, keeping {} candidates: {}",
                    page_index + 1,
                    query,
                    candidates.len(),
                    e
                );
                break;
            }
        };

        debug!(
            "Search page {} for '{}': {} hits",
            page_index + 1,
            query,
            page.items.len()
        );

        for hit in page.items {
            let locator = hit.locator.trim();
            if locator.is_empty() || !seen.insert(locator.to_string()) {
                continue;
            }
            candidates.push(CandidateItem::new(
                hit.title.trim(),
                locator,
                candidates.len() + 1,
            ));
            if candidates.len() == limit {
                info!("Found {} candidates for '{}'", limit, query);
                return Ok(candidates);
            }
        }

        match page.next_page {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!("Found {} candidates for '{}'", candidates.len(), query);
    Ok(candidates)
}
