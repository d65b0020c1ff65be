//! YouTube Data API v3 search
//!
//! One call to `search.list` per page; `nextPageToken` signals that more
//! results are available.

use crate::SearchProviderError;
use bom_domain::{SearchHit, SearchPage, SearchProvider};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Largest page the API accepts
pub const MAX_PAGE_SIZE: usize = 50;

/// Default timeout for a single request (20 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// YouTube video search
pub struct YouTubeSearch {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: ResultId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

impl SearchListResponse {
    fn into_page(self) -> SearchPage {
        let items = self
            .items
            .into_iter()
            .filter_map(|result| {
                let video_id = result.id.video_id?;
                Some(SearchHit {
                    title: result.snippet.map(|s| s.title).unwrap_or_default(),
                    locator: format!("{}{}", WATCH_URL, video_id),
                })
            })
            .collect();
        SearchPage {
            items,
            next_page: self.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

impl YouTubeSearch {
    /// Create a search client against the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a search client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, SearchProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                SearchProviderError::Communication(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Fetch one page of video results
    pub async fn search_page_async(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SearchProviderError> {
        let url = format!("{}/youtube/v3/search", self.base_url);
        let max_results = page_size.clamp(1, MAX_PAGE_SIZE).to_string();

        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        debug!("YouTube search '{}' (page token {:?})", query, page_token);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchProviderError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(SearchProviderError::AccessDenied(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchProviderError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: SearchListResponse = response.json().await.map_err(|e| {
            SearchProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(body.into_page())
    }
}

impl SearchProvider for YouTubeSearch {
    type Error = SearchProviderError;

    fn search_page(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, Self::Error> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SearchProviderError::Communication(format!("Failed to start runtime: {}", e)))?
            .block_on(self.search_page_async(query, page_size, page_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_conversion() {
        let body: SearchListResponse = serde_json::from_str(
            r#"{
                "kind": "youtube#searchListResponse",
                "nextPageToken": "CAUQAA",
                "items": [
                    {"id": {"kind": "youtube#video", "videoId": "abc123"},
                     "snippet": {"title": "Starter pistol 1000fps"}},
                    {"id": {"kind": "youtube#channel", "channelId": "UCx"},
                     "snippet": {"title": "A channel"}},
                    {"id": {"kind": "youtube#video", "videoId": "def456"}}
                ]
            }"#,
        )
        .unwrap();

        let page = body.into_page();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].locator, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(page.items[0].title, "Starter pistol 1000fps");
        assert_eq!(page.items[1].title, "");
        assert!(page.has_more());
    }

    #[test]
    fn test_last_page_has_no_token() {
        let body: SearchListResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        let page = body.into_page();
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_unreachable_endpoint() {
        let search = YouTubeSearch::with_base_url("http://127.0.0.1:1", "key").unwrap();
        let result = search.search_page("gunshot", 5, None);
        assert!(matches!(result, Err(SearchProviderError::Communication(_))));
    }
}
