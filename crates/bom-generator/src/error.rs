//! Error types for query generation

use bom_provenance::LogError;
use thiserror::Error;

/// Errors that can occur while generating a query batch
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Required configuration or credential is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The text-generation provider failed, timed out, or returned nothing usable
    #[error("Provider error: {0}")]
    Provider(String),

    /// The prompt file could not be read or seeded
    #[error("Prompt file error: {0}")]
    Prompt(#[from] std::io::Error),

    /// The provenance log could not be written
    #[error("Provenance log error: {0}")]
    Log(#[from] LogError),
}
