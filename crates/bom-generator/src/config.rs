//! Configuration for the Query Generator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Query Generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum previously suggested queries folded into the prompt
    pub recent_limit: usize,

    /// Maximum time for a single generation call (seconds)
    pub generation_timeout_secs: u64,

    /// Send the local base instructions even when a hosted prompt is configured
    pub include_base_instructions: bool,
}

impl GeneratorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        if self.recent_limit > 10_000 {
            return Err("recent_limit cannot exceed 10000".to_string());
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            recent_limit: 200,
            generation_timeout_secs: 120,
            include_base_instructions: true,
        }
    }
}

impl GeneratorConfig {
    /// Aggressive preset: short timeout, small recency context
    pub fn aggressive() -> Self {
        Self {
            recent_limit: 50,
            generation_timeout_secs: 30,
            include_base_instructions: true,
        }
    }

    /// Lenient preset: long timeout, large recency context
    pub fn lenient() -> Self {
        Self {
            recent_limit: 1000,
            generation_timeout_secs: 300,
            include_base_instructions: true,
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
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_limit, 200);
        assert!(config.include_base_instructions);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(GeneratorConfig::aggressive().validate().is_ok());
        assert!(GeneratorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = GeneratorConfig {
            generation_timeout_secs: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GeneratorConfig::from_toml("recent_limit = 20").unwrap();
        assert_eq!(config.recent_limit, 20);
        assert_eq!(config.generation_timeout_secs, 120);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig::lenient();
        let parsed = GeneratorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
