//! Configuration for search and acquisition

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest page the search sources accept
pub const MAX_PAGE_SIZE: usize = 50;

/// Configuration for candidate search and the acquisition pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Results requested per search page
    pub page_size: usize,

    /// Maximum pages requested for one search
    pub max_pages: usize,

    /// Candidates considered per query
    pub candidate_limit: usize,

    /// Maximum time for a single fetch (seconds)
    pub fetch_timeout_secs: u64,

    /// Reject fetched bytes that are not recognizably audio or video
    pub require_recognized_media: bool,
}

impl AcquireConfig {
    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        if self.max_pages == 0 {
            return Err("max_pages must be greater than 0".to_string());
        }
        if self.candidate_limit == 0 {
            return Err("candidate_limit must be greater than 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for AcquireConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: 10,
            candidate_limit: 5,
            fetch_timeout_secs: 300,
            require_recognized_media: true,
        }
    }
}

impl AcquireConfig {
    /// Aggressive preset: few candidates, short fetch timeout
    pub fn aggressive() -> Self {
        Self {
            page_size: 10,
            max_pages: 2,
            candidate_limit: 3,
            fetch_timeout_secs: 60,
            require_recognized_media: true,
        }
    }

    /// Lenient preset: many candidates, long fetch timeout
    pub fn lenient() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: 20,
            candidate_limit: 20,
            fetch_timeout_secs: 900,
            require_recognized_media: false,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AcquireConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(AcquireConfig::aggressive().validate().is_ok());
        assert!(AcquireConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = AcquireConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AcquireConfig::from_toml("candidate_limit = 8").unwrap();
        assert_eq!(config.candidate_limit, 8);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert!(config.require_recognized_media);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AcquireConfig::aggressive();
        let parsed = AcquireConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
