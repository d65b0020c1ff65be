//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the systems it
//! talks to. Implementations live in `bom-providers`; all calls are blocking
//! from the caller's perspective.

use crate::media::FetchedMedia;
use crate::query::PromptRef;
use std::time::Duration;

/// A single request to a text-generation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier
    pub model: String,

    /// API credential for the provider
    pub api_key: String,

    /// Hosted prompt template to apply, if any
    pub prompt: Option<PromptRef>,

    /// Input text (full instructions, or trigger/context text for a hosted template)
    pub input: String,
}

/// Trait for text-generation operations
///
/// Implemented by the infrastructure layer (bom-providers)
pub trait TextGenerator {
    /// Error type for generation operations
    type Error;

    /// Generate raw text for a request
    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error>;
}

/// One search result as reported by the search source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Result locator (URL)
    pub locator: String,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Hits in relevance order
    pub items: Vec<SearchHit>,
    /// Token for the next page, `None` when the source is exhausted
    pub next_page: Option<String>,
}

impl SearchPage {
    /// Whether the source reports more results
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Trait for paginated search
///
/// Implemented by the infrastructure layer (bom-providers)
pub trait SearchProvider {
    /// Error type for search operations
    type Error;

    /// Fetch one page of results for `query`
    fn search_page(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, Self::Error>;
}

/// Trait for retrieving media and metadata for a locator
///
/// Implemented by the infrastructure layer (bom-providers)
pub trait MediaFetcher {
    /// Error type for fetch operations
    type Error;

    /// Retrieve raw media bytes and metadata
    ///
    /// Implementations give up once `timeout` has elapsed and leave no work
    /// running behind them (child processes included).
    fn fetch(&self, locator: &str, timeout: Duration) -> Result<FetchedMedia, Self::Error>;
}
