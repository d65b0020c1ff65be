//! Candidates and fetched media

use serde::{Deserialize, Deserializer, Serialize};

/// One ranked search result considered for acquisition
///
/// Produced by candidate search in the source's relevance order and never
/// re-ordered downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Human-readable title reported by the search source
    pub title: String,

    /// URL (or URL-equivalent) the fetcher can retrieve
    pub locator: String,

    /// 1-based position in the source's ranking
    pub rank: usize,
}

impl CandidateItem {
    /// Create a new candidate
    pub fn new(title: impl Into<String>, locator: impl Into<String>, rank: usize) -> Self {
        Self {
            title: title.into(),
            locator: locator.into(),
            rank,
        }
    }
}

/// Structured metadata describing a fetched media item
///
/// Field names follow the info-dict convention of common media downloaders so
/// the fetcher output can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    /// Stable identifier assigned by the source
    pub id: String,
    /// Title
    pub title: Option<String>,
    /// Uploader name
    pub uploader: Option<String>,
    /// Channel name
    pub channel: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    /// View count
    pub view_count: Option<u64>,
    /// Like count
    pub like_count: Option<u64>,
    /// Upload date (`YYYYMMDD`)
    pub upload_date: Option<String>,
    /// Description text
    pub description: Option<String>,
    /// Tags
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Categories
    #[serde(deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    /// Canonical page URL
    pub webpage_url: Option<String>,
    /// Thumbnail URL
    pub thumbnail: Option<String>,
    /// Format description
    pub format: Option<String>,
    /// File extension of the media bytes
    pub ext: Option<String>,
    /// Size in bytes as reported by the source
    pub filesize: Option<u64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw media bytes together with their metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMedia {
    /// Raw media bytes
    pub bytes: Vec<u8>,
    /// Structured metadata
    pub metadata: MediaMetadata,
}
