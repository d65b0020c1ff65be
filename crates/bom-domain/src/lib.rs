//! Bom Domain Layer
//!
//! Core value types and capability traits shared by every other crate in the
//! workspace. Infrastructure (HTTP clients, process spawning, file formats)
//! lives elsewhere; this crate only depends on `serde` for derives.
//!
//! ## Key Concepts
//!
//! - **Query batch**: the output of one generation call, logged as a unit
//! - **Candidate**: one ranked search result considered for acquisition
//! - **Fetched media**: raw bytes plus structured metadata for a candidate
//!
//! ## Capabilities
//!
//! The pipeline talks to three external systems through traits:
//! [`TextGenerator`](traits::TextGenerator),
//! [`SearchProvider`](traits::SearchProvider) and
//! [`MediaFetcher`](traits::MediaFetcher).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod media;
pub mod query;
pub mod traits;

// Re-exports for convenience
pub use media::{CandidateItem, FetchedMedia, MediaMetadata};
pub use query::{PromptRef, QueryBatch, LOCAL_PROMPT_ID};
pub use traits::{
    GenerationRequest, MediaFetcher, SearchHit, SearchPage, SearchProvider, TextGenerator,
};
