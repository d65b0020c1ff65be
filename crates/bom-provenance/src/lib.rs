//! Bom Provenance Log
//!
//! Append-only, durable record of every query batch ever produced.
//!
//! # Format
//!
//! The log is a JSON Lines file: one self-contained [`QueryBatch`] object per
//! line, in chronological order. Records are never rewritten or deleted.
//!
//! # Reading
//!
//! Readers are lazy and restartable. Each line is decoded independently into a
//! `Result<QueryBatch, RecordError>`; a corrupt or partially written line is
//! reported as an `Err` for that line only and never aborts the scan.
//! [`ProvenanceLog::read_all`] drops such lines, [`ProvenanceLog::records`]
//! exposes them.
//!
//! # Examples
//!
//! ```no_run
//! use bom_provenance::{seal_batch, ProvenanceLog};
//! use bom_domain::PromptRef;
//!
//! let log = ProvenanceLog::new("data/openai_responses.jsonl");
//! log.ensure_initialized().unwrap();
//!
//! let batch = seal_batch(
//!     "gpt-4.1-mini",
//!     &PromptRef::local(),
//!     "prompt text",
//!     "starter pistol slow motion",
//!     vec!["starter pistol slow motion".to_string()],
//! );
//! log.append(&batch).unwrap();
//!
//! let recent = log.recent_queries(200).unwrap();
//! assert_eq!(recent[0], "starter pistol slow motion");
//! ```

#![warn(missing_docs)]

mod batch;
mod dedup;
mod reverse;

pub use batch::{queries_hash, seal_batch, seal_batch_at, sha256_hex};
pub use dedup::recent_queries;
pub use reverse::ReverseLines;

use bom_domain::QueryBatch;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during log operations
#[derive(Error, Debug)]
pub enum LogError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single log line could not be turned into a batch
///
/// Readers skip lines that produce this error; it is never fatal to a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Line is not a valid JSON record
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// Line is not valid UTF-8
    #[error("Record is not valid UTF-8")]
    InvalidUtf8,

    /// Stored query hash does not match the stored queries
    #[error("Query hash mismatch (stored {stored}, computed {computed})")]
    HashMismatch {
        /// Hash found in the record
        stored: String,
        /// Hash recomputed from the record's queries
        computed: String,
    },

    /// Underlying read failed; the scan stops after this item
    #[error("Read error: {0}")]
    Io(String),
}

/// Decode and verify one log line
///
/// # Examples
///
/// ```
/// use bom_provenance::{parse_record, RecordError};
///
/// assert!(matches!(parse_record("{not json"), Err(RecordError::Malformed(_))));
/// ```
pub fn parse_record(line: &str) -> Result<QueryBatch, RecordError> {
    let batch: QueryBatch =
        serde_json::from_str(line.trim()).map_err(|e| RecordError::Malformed(e.to_string()))?;

    if let Some(stored) = &batch.queries_sha256 {
        let computed = queries_hash(&batch.queries).unwrap_or_default();
        if *stored != computed {
            return Err(RecordError::HashMismatch {
                stored: stored.clone(),
                computed,
            });
        }
    }

    Ok(batch)
}

fn parse_line(bytes: &[u8]) -> Option<Result<QueryBatch, RecordError>> {
    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line,
        Err(_) => return Some(Err(RecordError::InvalidUtf8)),
    };
    if line.trim().is_empty() {
        return None;
    }
    Some(parse_record(line))
}

/// JSONL-backed provenance log
///
/// Single writer, any number of readers. Every append is one `write_all` of a
/// complete line, so a reader racing a writer sees at worst one partial line,
/// which it skips.
#[derive(Debug, Clone)]
pub struct ProvenanceLog {
    path: PathBuf,
}

impl ProvenanceLog {
    /// Create a log handle for the given file path
    ///
    /// Nothing is touched on disk until [`ensure_initialized`](Self::ensure_initialized)
    /// or [`append`](Self::append) is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the directory holding the log exists
    ///
    /// Idempotent. The log file itself is created lazily by the first append.
    pub fn ensure_initialized(&self) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Durably append one batch as a single line
    pub fn append(&self, batch: &QueryBatch) -> Result<(), LogError> {
        self.ensure_initialized()?;

        let mut line = serde_json::to_string(batch)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        // A writer that died mid-record leaves no trailing newline; start a
        // fresh line so the new record stays parseable.
        if ends_without_newline(&mut file)? {
            line.insert(0, '\n');
        }

        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        debug!(
            "Appended batch with {} queries to {}",
            batch.queries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Iterate every record in file order, including per-line errors
    ///
    /// A missing log file yields an empty iterator. Calling this again starts
    /// a fresh scan.
    pub fn records(&self) -> Result<Records, LogError> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Records {
            reader,
            line_no: 0,
        })
    }

    /// Iterate the well-formed batches in file order
    ///
    /// Corrupt lines are skipped and scanning continues.
    pub fn read_all(&self) -> Result<impl Iterator<Item = QueryBatch>, LogError> {
        Ok(self.records()?.filter_map(|record| match record {
            Ok(batch) => Some(batch),
            Err(e) => {
                debug!("Skipping log record: {}", e);
                None
            }
        }))
    }

    /// Iterate every record from the newest to the oldest
    ///
    /// Reads the file backwards in blocks, so a scan that stops early only
    /// touches the tail of the log.
    pub fn records_rev(&self) -> Result<RecordsRev, LogError> {
        let lines = match File::open(&self.path) {
            Ok(file) => Some(ReverseLines::new(file)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(RecordsRev { lines })
    }

    /// Up to `limit` distinct queries, most recent first
    ///
    /// See [`recent_queries`].
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<String>, LogError> {
        recent_queries(self, limit)
    }
}

fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Forward iterator over log records
pub struct Records {
    reader: Option<BufReader<File>>,
    line_no: usize,
}

impl Iterator for Records {
    type Item = Result<QueryBatch, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {
                    self.line_no += 1;
                    if let Some(record) = parse_line(&buf) {
                        if let Err(e) = &record {
                            debug!("Log line {}: {}", self.line_no, e);
                        }
                        return Some(record);
                    }
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(RecordError::Io(e.to_string())));
                }
            }
        }
    }
}

/// Backward iterator over log records
pub struct RecordsRev {
    lines: Option<ReverseLines<File>>,
}

impl Iterator for RecordsRev {
    type Item = Result<QueryBatch, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let lines = self.lines.as_mut()?;
            match lines.next() {
                None => {
                    self.lines = None;
                    return None;
                }
                Some(Ok(bytes)) => {
                    if let Some(record) = parse_line(&bytes) {
                        return Some(record);
                    }
                }
                Some(Err(e)) => {
                    self.lines = None;
                    return Some(Err(RecordError::Io(e.to_string())));
                }
            }
        }
    }
}
