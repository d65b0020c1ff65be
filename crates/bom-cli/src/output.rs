//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use bom_acquire::{AcquisitionExhausted, AcquisitionResult, ArtifactPaths, FailedAttempt};
use bom_domain::{CandidateItem, QueryBatch};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Outcome of acquiring a sample for one query during `run`.
#[derive(Debug)]
pub enum QueryOutcome {
    /// A sample was saved
    Acquired {
        /// The query
        query: String,
        /// Saved media file
        media: String,
    },
    /// No usable sample was found
    Failed {
        /// The query
        query: String,
        /// Why
        reason: String,
    },
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a plain list of queries.
    pub fn format_queries(&self, queries: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(queries)?),
            OutputFormat::Quiet => Ok(queries.join("\n")),
            OutputFormat::Table => {
                if queries.is_empty() {
                    return Ok(self.colorize("No queries found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Query"]);
                for (i, query) in queries.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), query.clone()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a freshly generated batch.
    pub fn format_batch(&self, batch: &QueryBatch) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(batch)?),
            _ => self.format_queries(&batch.queries),
        }
    }

    /// Format logged batches.
    pub fn format_batches(&self, batches: &[QueryBatch]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(batches)?),
            OutputFormat::Quiet => Ok(batches
                .iter()
                .map(|b| b.timestamp.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if batches.is_empty() {
                    return Ok(self.colorize("No batches logged.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Time", "Model", "Prompt", "Queries", "First query"]);
                for batch in batches {
                    let prompt = match &batch.prompt_version {
                        Some(version) => format!("{}@{}", batch.prompt_id, version),
                        None => batch.prompt_id.clone(),
                    };
                    builder.push_record([
                        batch.timestamp.clone(),
                        batch.model.clone(),
                        prompt,
                        batch.len().to_string(),
                        batch.queries.first().cloned().unwrap_or_default(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format ranked candidates.
    pub fn format_candidates(&self, candidates: &[CandidateItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(candidates)?),
            OutputFormat::Quiet => Ok(candidates
                .iter()
                .map(|c| c.locator.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if candidates.is_empty() {
                    return Ok(self.colorize("No candidates found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Rank", "Title", "Locator"]);
                for candidate in candidates {
                    builder.push_record([
                        candidate.rank.to_string(),
                        candidate.title.clone(),
                        candidate.locator.clone(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a successful acquisition.
    pub fn format_acquisition(
        &self,
        result: &AcquisitionResult,
        paths: &ArtifactPaths,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "candidate": result.candidate,
                "id": result.media.metadata.id,
                "title": result.media.metadata.title,
                "bytes": result.media.bytes.len(),
                "media_path": paths.media,
                "metadata_path": paths.metadata,
                "failed_attempts": result.attempts,
            }))?),
            OutputFormat::Quiet => Ok(paths.media.display().to_string()),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if !result.attempts.is_empty() {
                    lines.push(self.format_attempts(&result.attempts));
                }
                lines.push(self.success(&format!(
                    "Saved candidate #{} '{}' to {}",
                    result.candidate.rank,
                    result.candidate.title,
                    paths.media.display()
                )));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format an exhausted acquisition.
    pub fn format_exhausted(&self, exhausted: &AcquisitionExhausted) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(exhausted)?),
            OutputFormat::Quiet => Ok(String::new()),
            OutputFormat::Table => {
                if exhausted.attempts.is_empty() {
                    return Ok(self.warning("No candidates to try."));
                }
                Ok(format!(
                    "{}\n{}",
                    self.format_attempts(&exhausted.attempts),
                    self.error(&exhausted.to_string())
                ))
            }
        }
    }

    /// Format the per-query summary of a run.
    pub fn format_run(&self, batch: &QueryBatch, outcomes: &[QueryOutcome]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let results: Vec<_> = outcomes
                    .iter()
                    .map(|o| match o {
                        QueryOutcome::Acquired { query, media } => {
                            serde_json::json!({"query": query, "media": media})
                        }
                        QueryOutcome::Failed { query, reason } => {
                            serde_json::json!({"query": query, "error": reason})
                        }
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "batch": batch,
                    "results": results,
                }))?)
            }
            OutputFormat::Quiet => Ok(outcomes
                .iter()
                .filter_map(|o| match o {
                    QueryOutcome::Acquired { media, .. } => Some(media.clone()),
                    QueryOutcome::Failed { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Query", "Result"]);
                let mut acquired = 0;
                for outcome in outcomes {
                    match outcome {
                        QueryOutcome::Acquired { query, media } => {
                            acquired += 1;
                            builder.push_record([query.clone(), self.colorize(media, "green")]);
                        }
                        QueryOutcome::Failed { query, reason } => {
                            builder.push_record([query.clone(), self.colorize(reason, "red")]);
                        }
                    }
                }
                Ok(format!(
                    "{}\n{}",
                    self.render(builder),
                    self.info(&format!(
                        "Acquired {} of {} queries",
                        acquired,
                        outcomes.len()
                    ))
                ))
            }
        }
    }

    fn format_attempts(&self, attempts: &[FailedAttempt]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Rank", "Locator", "Error"]);
        for attempt in attempts {
            builder.push_record([
                attempt.candidate.rank.to_string(),
                attempt.candidate.locator.clone(),
                attempt.error.to_string(),
            ]);
        }
        self.render(builder)
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
