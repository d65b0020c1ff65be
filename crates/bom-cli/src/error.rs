//! Error types for the CLI application.

use bom_acquire::{AcquisitionExhausted, ArtifactError, SearchError};
use bom_generator::GeneratorError;
use bom_provenance::LogError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query generation error
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Provenance log error
    #[error("Query log error: {0}")]
    Log(#[from] LogError),

    /// Candidate search error
    #[error(transparent)]
    Search(#[from] SearchError),

    /// No candidate produced usable media
    #[error(transparent)]
    Exhausted(#[from] AcquisitionExhausted),

    /// Artifact write error
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Provider construction error
    #[error("Provider error: {0}")]
    Provider(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
