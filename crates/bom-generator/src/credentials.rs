//! Provider credentials
//!
//! Credentials are resolved once, from the process environment and an
//! optional `KEY=VALUE` override file, into an explicit [`Credentials`] value
//! that is passed to whatever needs it. A value already present in the
//! environment always wins over the file.

use crate::error::GeneratorError;
use bom_domain::PromptRef;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Environment variable holding the text-generation API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the hosted prompt id
pub const OPENAI_PROMPT_ID: &str = "OPENAI_PROMPT_ID";
/// Environment variable holding the hosted prompt version
pub const OPENAI_PROMPT_VERSION: &str = "OPENAI_PROMPT_VERSION";
/// Environment variable holding the search API key
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

const KEYS: [&str; 4] = [
    OPENAI_API_KEY,
    OPENAI_PROMPT_ID,
    OPENAI_PROMPT_VERSION,
    YOUTUBE_API_KEY,
];

/// Resolved credentials for the external providers
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    values: HashMap<&'static str, String>,
}

impl Credentials {
    /// Resolve from the process environment plus an optional override file
    pub fn from_env(override_file: Option<&Path>) -> Result<Self, GeneratorError> {
        Self::load(|key| std::env::var(key).ok(), override_file)
    }

    /// Resolve using `lookup` as the environment
    ///
    /// A missing override file is not an error; an unreadable or malformed
    /// one is.
    pub fn load<F>(lookup: F, override_file: Option<&Path>) -> Result<Self, GeneratorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut file_values = HashMap::new();
        if let Some(path) = override_file {
            if path.exists() {
                let entries = dotenvy::from_path_iter(path).map_err(|e| {
                    GeneratorError::Configuration(format!("{}: {}", path.display(), e))
                })?;
                for entry in entries {
                    let (key, value) = entry.map_err(|e| {
                        GeneratorError::Configuration(format!("{}: {}", path.display(), e))
                    })?;
                    file_values.insert(key, value);
                }
            } else {
                debug!("Credential file {} not found, skipping", path.display());
            }
        }

        let mut values = HashMap::new();
        for key in KEYS {
            let value = lookup(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_values.remove(key).filter(|v| !v.trim().is_empty()));
            if let Some(value) = value {
                values.insert(key, value.trim().to_string());
            }
        }

        Ok(Self { values })
    }

    /// Set a single value, replacing any resolved one
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Text-generation API key, if configured
    pub fn openai_api_key(&self) -> Option<&str> {
        self.values.get(OPENAI_API_KEY).map(String::as_str)
    }

    /// Text-generation API key, or a configuration error when absent
    pub fn require_api_key(&self) -> Result<&str, GeneratorError> {
        self.openai_api_key().ok_or_else(|| {
            GeneratorError::Configuration(format!("{} is not set", OPENAI_API_KEY))
        })
    }

    /// Hosted prompt template, when a prompt id is configured
    pub fn hosted_prompt(&self) -> Option<PromptRef> {
        let id = self.values.get(OPENAI_PROMPT_ID)?;
        Some(PromptRef::hosted(
            id.clone(),
            self.values.get(OPENAI_PROMPT_VERSION).cloned(),
        ))
    }

    /// Search API key, if configured
    pub fn youtube_api_key(&self) -> Option<&str> {
        self.values.get(YOUTUBE_API_KEY).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set: Vec<_> = self.values.keys().copied().collect();
        set.sort_unstable();
        f.debug_struct("Credentials").field("set", &set).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let creds = Credentials::load(env(&[]), None).unwrap();
        assert!(creds.openai_api_key().is_none());
        assert!(matches!(
            creds.require_api_key(),
            Err(GeneratorError::Configuration(_))
        ));
        assert!(creds.hosted_prompt().is_none());
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let creds = Credentials::load(env(&[(OPENAI_API_KEY, "  ")]), None).unwrap();
        assert!(creds.openai_api_key().is_none());
    }

    #[test]
    fn test_hosted_prompt_with_version() {
        let creds = Credentials::load(
            env(&[(OPENAI_PROMPT_ID, "pmpt_1"), (OPENAI_PROMPT_VERSION, "2")]),
            None,
        )
        .unwrap();
        let prompt = creds.hosted_prompt().unwrap();
        assert_eq!(prompt.id, "pmpt_1");
        assert_eq!(prompt.version.as_deref(), Some("2"));
        assert!(prompt.is_hosted());
    }

    #[test]
    fn test_file_fills_gaps_but_never_overrides_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "OPENAI_API_KEY=from-file").unwrap();
        writeln!(file, "YOUTUBE_API_KEY=yt-from-file").unwrap();
        writeln!(file, "UNRELATED=ignored").unwrap();

        let creds =
            Credentials::load(env(&[(OPENAI_API_KEY, "from-env")]), Some(file.path())).unwrap();
        assert_eq!(creds.openai_api_key(), Some("from-env"));
        assert_eq!(creds.youtube_api_key(), Some("yt-from-file"));
    }

    #[test]
    fn test_missing_override_file_is_ignored() {
        let creds = Credentials::load(
            env(&[(YOUTUBE_API_KEY, "k")]),
            Some(Path::new("/nonexistent/bom.env")),
        )
        .unwrap();
        assert_eq!(creds.youtube_api_key(), Some("k"));
    }

    #[test]
    fn test_debug_does_not_leak_values() {
        let creds = Credentials::default().with(OPENAI_API_KEY, "sk-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains(OPENAI_API_KEY));
        assert!(!printed.contains("sk-secret"));
    }
}
