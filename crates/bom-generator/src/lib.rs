//! Bom Query Generator
//!
//! Asks a text-generation provider for new search queries, normalizes the
//! output, and records every successful batch in the provenance log.
//!
//! # Architecture
//!
//! ```text
//! ProvenanceLog ─ recent queries ─┐
//! PromptFile ─ base instructions ─┴→ PromptBuilder → TextGenerator → parser → ProvenanceLog
//! ```
//!
//! # Key Features
//!
//! - **Recency context**: previously suggested queries are folded into the prompt
//! - **Tolerant parsing**: JSON arrays, one-per-line lists, comma fallback
//! - **Provenance**: exactly one log append per successful call
//! - **Hosted prompts**: a provider-side template id/version can replace or
//!   accompany the local instructions
//!
//! # Example Usage
//!
//! ```no_run
//! use bom_generator::{Credentials, GeneratorConfig, PromptFile, QueryGenerator};
//! use bom_provenance::ProvenanceLog;
//! use bom_providers::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = QueryGenerator::new(
//!     MockProvider::new("gunshot echo canyon\nstarter pistol 240fps"),
//!     ProvenanceLog::new("data/openai_responses.jsonl"),
//!     PromptFile::new("data/prompt.txt"),
//!     Credentials::from_env(None)?,
//!     GeneratorConfig::default(),
//! );
//!
//! let generation = generator.generate("gpt-4.1-mini", true).await?;
//! for query in &generation.batch.queries {
//!     println!("{}", query);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod credentials;
mod error;
mod generator;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::GeneratorConfig;
pub use credentials::{
    Credentials, OPENAI_API_KEY, OPENAI_PROMPT_ID, OPENAI_PROMPT_VERSION, YOUTUBE_API_KEY,
};
pub use error::GeneratorError;
pub use generator::{Generation, QueryGenerator};
pub use parser::{parse_queries, ParseStrategy, ParsedQueries};
pub use prompt::{PromptBuilder, PromptFile, DEFAULT_PROMPT, HOSTED_TRIGGER};
