//! Scripted search and fetch providers for tests and dry runs

use crate::{FetchError, SearchProviderError};
use bom_domain::{
    FetchedMedia, MediaFetcher, MediaMetadata, SearchHit, SearchPage, SearchProvider,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Minimal valid 16-bit mono PCM WAV (header plus `samples` zeroed samples)
pub fn wav_bytes(samples: usize) -> Vec<u8> {
    let data_len = (samples * 2) as u32;
    let mut bytes = Vec::with_capacity(44 + samples * 2);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&48_000u32.to_le_bytes());
    bytes.extend_from_slice(&96_000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + samples * 2, 0);
    bytes
}

/// Search provider that serves pre-built pages
///
/// Page `n` is requested with token `"page-n"`; the first page has no token.
#[derive(Debug, Clone, Default)]
pub struct MockSearch {
    pages: Vec<Vec<SearchHit>>,
    fail_on_page: Option<usize>,
    calls: Arc<Mutex<Vec<(String, usize, Option<String>)>>>,
}

impl MockSearch {
    /// Serve the given pages in order
    pub fn new(pages: Vec<Vec<SearchHit>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Serve a single page built from `(title, locator)` pairs
    pub fn single_page(hits: &[(&str, &str)]) -> Self {
        Self::new(vec![hits
            .iter()
            .map(|(title, locator)| SearchHit {
                title: title.to_string(),
                locator: locator.to_string(),
            })
            .collect()])
    }

    /// Fail when page `index` (0-based) is requested
    pub fn fail_on_page(mut self, index: usize) -> Self {
        self.fail_on_page = Some(index);
        self
    }

    /// Number of page requests received
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Page sizes requested so far, oldest first
    pub fn requested_page_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|c| c.1).collect()
    }
}

impl SearchProvider for MockSearch {
    type Error = SearchProviderError;

    fn search_page(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, Self::Error> {
        self.calls.lock().unwrap().push((
            query.to_string(),
            page_size,
            page_token.map(str::to_string),
        ));

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| {
                    SearchProviderError::InvalidResponse(format!("Unknown page token {}", token))
                })?,
        };

        if self.fail_on_page == Some(index) {
            return Err(SearchProviderError::Communication(
                "Mock search unavailable".to_string(),
            ));
        }

        let items = self
            .pages
            .get(index)
            .map(|page| page.iter().take(page_size).cloned().collect())
            .unwrap_or_default();
        let next_page = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(SearchPage { items, next_page })
    }
}

/// Fetcher with a scripted outcome per locator
///
/// Unknown locators fail with [`FetchError::Unavailable`]. Every attempted
/// locator is recorded in order.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    outcomes: HashMap<String, Result<FetchedMedia, String>>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Create a fetcher that fails every locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed for `locator` with a short WAV clip identified by `id`
    pub fn with_audio(mut self, locator: impl Into<String>, id: impl Into<String>) -> Self {
        let metadata = MediaMetadata {
            id: id.into(),
            title: Some("Mock clip".to_string()),
            ext: Some("wav".to_string()),
            ..MediaMetadata::default()
        };
        self.outcomes.insert(
            locator.into(),
            Ok(FetchedMedia {
                bytes: wav_bytes(480),
                metadata,
            }),
        );
        self
    }

    /// Succeed for `locator` with arbitrary media
    pub fn with_media(mut self, locator: impl Into<String>, media: FetchedMedia) -> Self {
        self.outcomes.insert(locator.into(), Ok(media));
        self
    }

    /// Fail for `locator` with the given message
    pub fn with_failure(mut self, locator: impl Into<String>, message: impl Into<String>) -> Self {
        self.outcomes.insert(locator.into(), Err(message.into()));
        self
    }

    /// Locators attempted so far, oldest first
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MediaFetcher for MockFetcher {
    type Error = FetchError;

    fn fetch(&self, locator: &str, _timeout: Duration) -> Result<FetchedMedia, Self::Error> {
        self.attempts.lock().unwrap().push(locator.to_string());

        match self.outcomes.get(locator) {
            Some(Ok(media)) => Ok(media.clone()),
            Some(Err(message)) => Err(FetchError::Unavailable(message.clone())),
            None => Err(FetchError::Unavailable(format!("no media for {}", locator))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_header() {
        let bytes = wav_bytes(10);
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_mock_search_pagination() {
        let hit = |n: usize| SearchHit {
            title: format!("t{}", n),
            locator: format!("u{}", n),
        };
        let search = MockSearch::new(vec![vec![hit(1), hit(2)], vec![hit(3)]]);

        let first = search.search_page("q", 10, None).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page.as_deref(), Some("page-1"));

        let second = search.search_page("q", 10, Some("page-1")).unwrap();
        assert_eq!(second.items[0].locator, "u3");
        assert!(!second.has_more());
        assert_eq!(search.call_count(), 2);
    }

    #[test]
    fn test_mock_search_failure() {
        let search = MockSearch::single_page(&[("a", "u1")]).fail_on_page(0);
        assert!(search.search_page("q", 5, None).is_err());
    }

    #[test]
    fn test_mock_fetcher_records_attempts() {
        let fetcher = MockFetcher::new()
            .with_failure("u1", "gone")
            .with_audio("u2", "clip2");
        let budget = Duration::from_secs(1);

        assert!(fetcher.fetch("u1", budget).is_err());
        assert_eq!(fetcher.fetch("u2", budget).unwrap().metadata.id, "clip2");
        assert!(fetcher.fetch("u3", budget).is_err());
        assert_eq!(fetcher.attempts(), vec!["u1", "u2", "u3"]);
    }
}
