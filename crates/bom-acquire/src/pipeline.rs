//! First-success acquisition over ranked candidates
//!
//! Candidates are tried strictly in rank order. The first one that yields
//! usable media ends the run; the rest are never attempted. Individual
//! failures are recorded and logged, and only surface as an error when every
//! candidate has failed.
//!
//! The fetcher receives the fetch timeout and must stop its own work when it
//! passes, so no fetch outlives the attempt that started it.

use crate::config::AcquireConfig;
use crate::error::{AcquisitionExhausted, CandidateFetchError, FailedAttempt};
use bom_domain::{CandidateItem, FetchedMedia, MediaFetcher};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Extra wait for a fetcher that overruns its own deadline
const FETCH_GRACE: Duration = Duration::from_secs(5);

/// Media obtained from the first candidate that worked
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionResult {
    /// The candidate that produced the media
    pub candidate: CandidateItem,
    /// Bytes and metadata
    pub media: FetchedMedia,
    /// Failures that preceded the success, in rank order
    pub attempts: Vec<FailedAttempt>,
}

/// Broad class of fetched bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Recognized audio container
    Audio,
    /// Recognized video container
    Video,
    /// Anything else
    Unknown,
}

impl MediaKind {
    /// Sniff the kind of `bytes` from its magic number
    pub fn detect(bytes: &[u8]) -> Self {
        match infer::get(bytes).map(|t| t.matcher_type()) {
            Some(infer::MatcherType::Audio) => MediaKind::Audio,
            Some(infer::MatcherType::Video) => MediaKind::Video,
            _ => MediaKind::Unknown,
        }
    }
}

enum State {
    Ready(usize),
    Done(Box<AcquisitionResult>),
    Failed,
}

/// Drives candidates through fetch and validation until one succeeds
pub struct AcquisitionPipeline<F>
where
    F: MediaFetcher,
{
    fetcher: Arc<F>,
    config: AcquireConfig,
}

impl<F> AcquisitionPipeline<F>
where
    F: MediaFetcher + Send + Sync + 'static,
    F::Error: std::fmt::Display,
{
    /// Create a new AcquisitionPipeline
    pub fn new(fetcher: F, config: AcquireConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    /// Media from the first candidate that yields usable media
    pub async fn acquire_first_success(
        &self,
        candidates: &[CandidateItem],
    ) -> Result<AcquisitionResult, AcquisitionExhausted> {
        let mut attempts = Vec::new();
        let mut state = State::Ready(0);

        loop {
            state = match state {
                State::Ready(i) => match candidates.get(i) {
                    None => State::Failed,
                    Some(candidate) => match self.attempt(candidate).await {
                        Ok(media) => {
                            info!(
                                "Acquired '{}' from candidate #{} ({} bytes)",
                                media.metadata.id,
                                candidate.rank,
                                media.bytes.len()
                            );
                            State::Done(Box::new(AcquisitionResult {
                                candidate: candidate.clone(),
                                media,
                                attempts: std::mem::take(&mut attempts),
                            }))
                        }
                        Err(error) => {
                            warn!(
                                "Candidate #{} ({}) failed: {}",
                                candidate.rank, candidate.locator, error
                            );
                            attempts.push(FailedAttempt {
                                candidate: candidate.clone(),
                                error,
                            });
                            State::Ready(i + 1)
                        }
                    },
                },
                State::Done(result) => return Ok(*result),
                State::Failed => {
                    warn!("No usable media among {} candidates", candidates.len());
                    return Err(AcquisitionExhausted { attempts });
                }
            };
        }
    }

    /// Fetch and validate one candidate
    async fn attempt(
        &self,
        candidate: &CandidateItem,
    ) -> Result<FetchedMedia, CandidateFetchError> {
        debug!("Fetching candidate #{}: {}", candidate.rank, candidate.locator);

        let budget = self.config.fetch_timeout();
        let timed_out = CandidateFetchError::Timeout(self.config.fetch_timeout_secs);

        let fetcher = Arc::clone(&self.fetcher);
        let locator = candidate.locator.clone();
        let started = Instant::now();
        let fetch = tokio::task::spawn_blocking(move || {
            fetcher.fetch(&locator, budget).map_err(|e| e.to_string())
        });

        let joined = match timeout(budget + FETCH_GRACE, fetch).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    "Fetcher ignored its {}s deadline for {}",
                    self.config.fetch_timeout_secs, candidate.locator
                );
                return Err(timed_out);
            }
        };

        let media = match joined
            .map_err(|e| CandidateFetchError::Fetch(format!("Task join error: {}", e)))?
        {
            Ok(media) => media,
            Err(message) if started.elapsed() >= budget => {
                debug!("Fetch of {} ran out of time: {}", candidate.locator, message);
                return Err(timed_out);
            }
            Err(message) => return Err(CandidateFetchError::Fetch(message)),
        };

        validate_media(&media, self.config.require_recognized_media)?;
        Ok(media)
    }
}

/// Check that fetched media is usable
pub fn validate_media(
    media: &FetchedMedia,
    require_recognized: bool,
) -> Result<(), CandidateFetchError> {
    if media.bytes.is_empty() {
        return Err(CandidateFetchError::Invalid("no media bytes".to_string()));
    }
    if media.metadata.id.trim().is_empty() {
        return Err(CandidateFetchError::Invalid(
            "metadata has no identifier".to_string(),
        ));
    }
    if require_recognized && MediaKind::detect(&media.bytes) == MediaKind::Unknown {
        return Err(CandidateFetchError::Invalid(
            "bytes are not a recognized audio or video format".to_string(),
        ));
    }
    Ok(())
}
