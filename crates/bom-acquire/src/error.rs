//! Error types for search and acquisition

use bom_domain::CandidateItem;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during candidate search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search source could not be reached or rejected the request
    #[error("Search unavailable: {0}")]
    Unavailable(String),
}

/// Why a single candidate could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CandidateFetchError {
    /// The fetcher reported an error
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The fetch did not finish in time
    #[error("Fetch timed out after {0}s")]
    Timeout(u64),

    /// The fetch returned something that is not usable media
    #[error("Invalid media: {0}")]
    Invalid(String),
}

/// One candidate that was tried and failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttempt {
    /// The candidate
    pub candidate: CandidateItem,
    /// What went wrong
    pub error: CandidateFetchError,
}

/// Every candidate was tried and none produced usable media
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("All {} candidates failed", .attempts.len())]
pub struct AcquisitionExhausted {
    /// Attempts in rank order
    pub attempts: Vec<FailedAttempt>,
}

impl AcquisitionExhausted {
    /// Error of the final attempt, `None` when there were no candidates
    pub fn last_error(&self) -> Option<&CandidateFetchError> {
        self.attempts.last().map(|a| &a.error)
    }
}

/// Errors that can occur while writing artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
