//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use bom_acquire::AcquireConfig;
use bom_generator::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default text-generation model
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Prompt file name inside the data directory
pub const PROMPT_FILE: &str = "prompt.txt";

/// Provenance log file name inside the data directory
pub const LOG_FILE: &str = "openai_responses.jsonl";

/// Audio artifact directory name inside the data directory
pub const AUDIO_DIR: &str = "audio";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (default: ~/.bom/data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Model used when none is given on the command line
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Provider endpoints and tools
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Query generation
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Search and acquisition
    #[serde(default)]
    pub acquire: AcquireConfig,
}

/// Provider endpoints and tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// OpenAI API base URL
    pub openai_base_url: String,

    /// YouTube Data API base URL
    pub youtube_base_url: String,

    /// `yt-dlp` executable
    pub ytdlp_binary: PathBuf,

    /// `yt-dlp` format selector
    pub ytdlp_format: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Locations inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Data directory
    pub root: PathBuf,
    /// Editable prompt file
    pub prompt: PathBuf,
    /// Provenance log
    pub log: PathBuf,
    /// Audio artifacts
    pub audio: PathBuf,
}

impl DataPaths {
    /// Standard layout under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            prompt: root.join(PROMPT_FILE),
            log: root.join(LOG_FILE),
            audio: root.join(AUDIO_DIR),
            root,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.default_model.trim().is_empty() {
            return Err(CliError::Config("default_model must not be empty".into()));
        }
        self.generator
            .validate()
            .map_err(|e| CliError::Config(format!("[generator] {}", e)))?;
        self.acquire
            .validate()
            .map_err(|e| CliError::Config(format!("[acquire] {}", e)))?;
        Ok(())
    }

    /// Data locations, with `override_dir` taking precedence over the file.
    pub fn data_paths(&self, override_dir: Option<&Path>) -> Result<DataPaths> {
        let root = match override_dir.or(self.data_dir.as_deref()) {
            Some(dir) => dir.to_path_buf(),
            None => base_dir()?.join("data"),
        };
        Ok(DataPaths::new(root))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_model: default_model(),
            providers: ProviderSettings::default(),
            settings: Settings::default(),
            generator: GeneratorConfig::default(),
            acquire: AcquireConfig::default(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai_base_url: bom_providers::openai::DEFAULT_BASE_URL.to_string(),
            youtube_base_url: bom_providers::youtube::DEFAULT_BASE_URL.to_string(),
            ytdlp_binary: PathBuf::from(bom_providers::ytdlp::DEFAULT_BINARY),
            ytdlp_format: bom_providers::ytdlp::DEFAULT_FORMAT.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn base_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".bom"))
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_model = \"gpt-4.1\"\n\n[generator]\nrecent_limit = 50\n\n[acquire]\ncandidate_limit = 2\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4.1");
        assert_eq!(config.generator.recent_limit, 50);
        assert_eq!(config.acquire.candidate_limit, 2);
        assert_eq!(config.acquire.page_size, AcquireConfig::default().page_size);
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[acquire]\npage_size = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.data_dir = Some(dir.path().join("data"));
        config.settings.format = OutputFormat::Json;

        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_data_dir_override_wins() {
        let mut config = Config::default();
        config.data_dir = Some(PathBuf::from("/from/config"));

        let paths = config.data_paths(Some(Path::new("/from/flag"))).unwrap();
        assert_eq!(paths.root, PathBuf::from("/from/flag"));
        assert_eq!(paths.log, PathBuf::from("/from/flag/openai_responses.jsonl"));

        let paths = config.data_paths(None).unwrap();
        assert_eq!(paths.prompt, PathBuf::from("/from/config/prompt.txt"));
    }
}
