//! Prompt file storage and prompt assembly

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Instruction text seeded into a fresh prompt file
pub const DEFAULT_PROMPT: &str = "You are an assistant that generates concise, high-quality YouTube \
search queries to find videos containing impulsive acoustic events suitable for audio analysis \
(e.g., gunshots, blank rounds, starter pistols, fireworks, metal impacts). Provide queries in \
English and optionally in other languages to broaden the search. Focus on real recordings, avoid \
generic sound effects. OUTPUT FORMAT: Respond with search queries ONLY, one per line, no \
explanations, no extra text, no commentary.";

/// Input sent with a hosted prompt when there is nothing else to send
pub const HOSTED_TRIGGER: &str = "Generate new search queries.";

const RECENT_HEADER: &str = "Previously suggested queries (do not repeat):";

/// The editable instruction file on disk
#[derive(Debug, Clone)]
pub struct PromptFile {
    path: PathBuf,
}

impl PromptFile {
    /// Refer to the prompt file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the prompt file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and seed the default instructions
    ///
    /// An existing file is never touched, so calling this repeatedly has the
    /// same effect as calling it once.
    pub fn ensure_initialized(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !self.path.exists() {
            debug!("Seeding prompt file {}", self.path.display());
            fs::write(&self.path, format!("{}\n", DEFAULT_PROMPT))?;
        }
        Ok(())
    }

    /// Current instruction text, trimmed
    ///
    /// A missing file is seeded first. A blank file falls back to the default
    /// instructions.
    pub fn load(&self) -> io::Result<String> {
        self.ensure_initialized()?;
        let text = fs::read_to_string(&self.path)?;
        let text = text.trim();
        if text.is_empty() {
            warn!(
                "Prompt file {} is blank, using default instructions",
                self.path.display()
            );
            return Ok(DEFAULT_PROMPT.to_string());
        }
        Ok(text.to_string())
    }
}

/// Builds the input text for one generation call
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    base_instructions: Option<String>,
    previous: Vec<String>,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Lead with the given instruction text
    pub fn with_base_instructions(mut self, text: impl Into<String>) -> Self {
        self.base_instructions = Some(text.into());
        self
    }

    /// Append the previously suggested queries, most recent first
    pub fn with_previous(mut self, queries: Vec<String>) -> Self {
        self.previous = queries;
        self
    }

    /// Build the complete input text
    pub fn build(&self) -> String {
        let mut sections = Vec::new();

        if let Some(base) = self.base_instructions.as_deref() {
            let base = base.trim();
            if !base.is_empty() {
                sections.push(base.to_string());
            }
        }

        if !self.previous.is_empty() {
            let mut block = String::from(RECENT_HEADER);
            for query in &self.previous {
                block.push_str("\n- ");
                block.push_str(query);
            }
            sections.push(block);
        }

        if sections.is_empty() {
            return HOSTED_TRIGGER.to_string();
        }
        sections.join("\n\n")
    }
}
