//! End-to-end tests: search, first-success acquisition, artifact persistence

use bom_acquire::{
    AcquireConfig, AcquisitionPipeline, ArtifactStore, CandidateFetchError, CandidateSearch,
};
use bom_domain::{CandidateItem, FetchedMedia, MediaFetcher, MediaMetadata, SearchHit};
use bom_providers::{wav_bytes, MockFetcher, MockSearch};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn candidates(n: usize) -> Vec<CandidateItem> {
    (1..=n)
        .map(|i| CandidateItem::new(format!("clip {}", i), format!("u{}", i), i))
        .collect()
}

#[tokio::test]
async fn test_second_candidate_wins_and_third_is_never_attempted() {
    let fetcher = MockFetcher::new()
        .with_failure("u1", "Video unavailable")
        .with_audio("u2", "second")
        .with_audio("u3", "third");
    let pipeline = AcquisitionPipeline::new(fetcher.clone(), AcquireConfig::default());

    let result = pipeline.acquire_first_success(&candidates(3)).await.unwrap();

    assert_eq!(result.candidate.locator, "u2");
    assert_eq!(result.media.metadata.id, "second");
    assert_eq!(result.attempts.len(), 1);
    assert_eq!(result.attempts[0].candidate.locator, "u1");
    assert_eq!(fetcher.attempts(), vec!["u1", "u2"]);
}

#[tokio::test]
async fn test_all_candidates_failing_reports_every_attempt() {
    let fetcher = MockFetcher::new()
        .with_failure("u1", "first reason")
        .with_failure("u2", "second reason");
    let pipeline = AcquisitionPipeline::new(fetcher.clone(), AcquireConfig::default());

    let exhausted = pipeline
        .acquire_first_success(&candidates(2))
        .await
        .unwrap_err();

    assert_eq!(exhausted.attempts.len(), 2);
    assert_eq!(exhausted.attempts[0].candidate.rank, 1);
    match exhausted.last_error() {
        Some(CandidateFetchError::Fetch(message)) => assert!(message.contains("second reason")),
        other => panic!("Expected fetch error, got {:?}", other),
    }
    assert_eq!(fetcher.attempts(), vec!["u1", "u2"]);
}

/// Stalls for 5s on `slow` unless its deadline cuts the stall short
#[derive(Clone, Default)]
struct StallingFetcher {
    in_flight: Arc<AtomicUsize>,
}

impl MediaFetcher for StallingFetcher {
    type Error = String;

    fn fetch(&self, locator: &str, timeout: Duration) -> Result<FetchedMedia, Self::Error> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = if locator == "slow" {
            std::thread::sleep(timeout.min(Duration::from_secs(5)));
            Err("gave up at deadline".to_string())
        } else {
            Ok(FetchedMedia {
                bytes: wav_bytes(32),
                metadata: MediaMetadata {
                    id: locator.to_string(),
                    ..MediaMetadata::default()
                },
            })
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[tokio::test]
async fn test_timeout_falls_through_to_next_candidate() {
    let config = AcquireConfig {
        fetch_timeout_secs: 1,
        ..AcquireConfig::default()
    };
    let fetcher = StallingFetcher::default();
    let pipeline = AcquisitionPipeline::new(fetcher.clone(), config);

    let started = Instant::now();
    let result = pipeline
        .acquire_first_success(&[
            CandidateItem::new("slow", "slow", 1),
            CandidateItem::new("fast", "fast", 2),
        ])
        .await
        .unwrap();

    assert_eq!(result.media.metadata.id, "fast");
    assert_eq!(result.attempts[0].error, CandidateFetchError::Timeout(1));
    assert!(started.elapsed() < Duration::from_secs(5));
    // The stalled fetch stopped before the next candidate started
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_then_acquire_then_persist() {
    let dir = TempDir::new().unwrap();
    let hit = |t: &str, l: &str| SearchHit {
        title: t.to_string(),
        locator: l.to_string(),
    };
    let search = CandidateSearch::new(
        MockSearch::new(vec![
            vec![hit("gone", "https://v/1"), hit("", "")],
            vec![hit("good", "https://v/2")],
        ]),
        AcquireConfig::default(),
    );
    let pipeline = AcquisitionPipeline::new(
        MockFetcher::new().with_audio("https://v/2", "vid2"),
        AcquireConfig::default(),
    );
    let store = ArtifactStore::new(dir.path().join("audio"));

    let found = search.search("blank round indoor range", 5).await.unwrap();
    assert_eq!(found.len(), 2);

    let result = pipeline.acquire_first_success(&found).await.unwrap();
    assert_eq!(result.candidate.rank, 2);

    let paths = store.persist(&result).unwrap();
    assert!(paths.media.ends_with("vid2.wav"));
    assert!(paths.metadata.ends_with("vid2.json"));

    let record = store.load_record("vid2").unwrap();
    assert_eq!(record.candidate.locator, "https://v/2");
    assert_eq!(record.metadata.id, "vid2");
}

#[tokio::test]
async fn test_persisting_same_id_twice_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    let pipeline = AcquisitionPipeline::new(
        MockFetcher::new().with_audio("u1", "same-id"),
        AcquireConfig::default(),
    );

    let result = pipeline.acquire_first_success(&candidates(1)).await.unwrap();
    let first = store.persist(&result).unwrap();
    let second = store.persist(&result).unwrap();

    assert_eq!(first, second);
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2, "unexpected files: {:?}", names);
}
