//! Bom Acquisition
//!
//! Turns a search query into one usable media sample.
//!
//! # Architecture
//!
//! ```text
//! query → CandidateSearch → [CandidateItem; n] → AcquisitionPipeline → ArtifactStore
//!              │                                        │
//!        SearchProvider                            MediaFetcher
//! ```
//!
//! Candidate search follows pagination until enough usable candidates are
//! collected. The pipeline tries candidates in rank order and stops at the
//! first one that yields recognizable media; only when every candidate fails
//! is an error reported.
//!
//! # Example Usage
//!
//! ```no_run
//! use bom_acquire::{AcquireConfig, AcquisitionPipeline, ArtifactStore, CandidateSearch};
//! use bom_providers::{MockFetcher, MockSearch};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AcquireConfig::default();
//! let search = CandidateSearch::new(MockSearch::single_page(&[("clip", "u1")]), config.clone());
//! let pipeline = AcquisitionPipeline::new(MockFetcher::new().with_audio("u1", "clip1"), config);
//!
//! let candidates = search.search("starter pistol", 5).await?;
//! let result = pipeline.acquire_first_success(&candidates).await?;
//! ArtifactStore::new("data/audio").persist(&result)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifacts;
mod config;
mod error;
mod pipeline;
mod search;

pub use artifacts::{artifact_id, ArtifactPaths, ArtifactRecord, ArtifactStore};
pub use config::{AcquireConfig, MAX_PAGE_SIZE};
pub use error::{
    AcquisitionExhausted, ArtifactError, CandidateFetchError, FailedAttempt, SearchError,
};
pub use pipeline::{validate_media, AcquisitionPipeline, AcquisitionResult, MediaKind};
pub use search::CandidateSearch;
