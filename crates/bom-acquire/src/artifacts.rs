//! On-disk artifacts for acquired media
//!
//! Each success produces `<id>.<ext>` with the media bytes and `<id>.json`
//! with the metadata record. Both are written through a temporary file and a
//! rename, and persisting the same id again replaces the previous pair,
//! including a media file left under a different extension.

use crate::error::ArtifactError;
use crate::pipeline::{AcquisitionResult, MediaKind};
use bom_domain::{CandidateItem, MediaMetadata};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Metadata record written next to the media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact identifier (file stem)
    pub id: String,
    /// When the media was acquired (UTC)
    pub acquired_at: String,
    /// Candidate the media came from
    pub candidate: CandidateItem,
    /// Media metadata as reported by the fetcher
    pub metadata: MediaMetadata,
    /// Media file name
    pub media_file: String,
    /// Size of the media file in bytes
    pub bytes: u64,
    /// SHA-256 hex digest of the media bytes
    pub sha256: String,
}

/// Paths of a persisted artifact pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Media file
    pub media: PathBuf,
    /// Metadata JSON file
    pub metadata: PathBuf,
}

/// Directory of acquired media and metadata
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Store artifacts under `dir`
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Artifact directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the media and metadata files for a successful acquisition
    pub fn persist(&self, result: &AcquisitionResult) -> Result<ArtifactPaths, ArtifactError> {
        fs::create_dir_all(&self.dir)?;

        let id = artifact_id(result);
        let ext = media_extension(result);
        let media_file = format!("{}.{}", id, ext);
        let paths = ArtifactPaths {
            media: self.dir.join(&media_file),
            metadata: self.dir.join(format!("{}.json", id)),
        };

        let bytes = &result.media.bytes;
        let record = ArtifactRecord {
            id: id.clone(),
            acquired_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            candidate: result.candidate.clone(),
            metadata: result.media.metadata.clone(),
            media_file,
            bytes: bytes.len() as u64,
            sha256: format!("{:x}", Sha256::digest(bytes)),
        };

        write_atomic(&paths.media, bytes)?;
        write_atomic(&paths.metadata, serde_json::to_string_pretty(&record)?.as_bytes())?;
        self.remove_stale(&id, &record.media_file)?;

        info!("Saved {} ({} bytes)", paths.media.display(), bytes.len());
        Ok(paths)
    }

    /// Delete `<id>.*` media files other than `keep`
    fn remove_stale(&self, id: &str, keep: &str) -> Result<(), ArtifactError> {
        let prefix = format!("{}.", id);
        let metadata_file = format!("{}.json", id);
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(ext) = name.strip_prefix(&prefix) else {
                continue;
            };
            if ext.contains('.') || name == keep || name == metadata_file {
                continue;
            }
            if entry.file_type()?.is_file() {
                debug!("Removing stale {}", entry.path().display());
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Read back a metadata record by artifact id
    pub fn load_record(&self, id: &str) -> Result<ArtifactRecord, ArtifactError> {
        let text = fs::read_to_string(self.dir.join(format!("{}.json", id)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// File stem for an acquisition
///
/// The sanitized media id, or a hash of the locator when the id has no
/// usable characters.
pub fn artifact_id(result: &AcquisitionResult) -> String {
    let id = sanitize(&result.media.metadata.id);
    if !id.is_empty() {
        return id;
    }
    let digest = format!("{:x}", Sha256::digest(result.candidate.locator.as_bytes()));
    format!("loc-{}", &digest[..16])
}

fn media_extension(result: &AcquisitionResult) -> String {
    if let Some(ext) = result.media.metadata.ext.as_deref() {
        let ext = sanitize(ext);
        if !ext.is_empty() {
            return ext;
        }
    }
    if MediaKind::detect(&result.media.bytes) == MediaKind::Unknown {
        return "bin".to_string();
    }
    infer::get(&result.media.bytes)
        .map(|t| t.extension().to_string())
        .unwrap_or_else(|| "bin".to_string())
}

/// Keep ASCII alphanumerics, `-` and `_`; everything else becomes `_`
fn sanitize(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '_') {
        String::new()
    } else {
        cleaned
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    debug!("Writing {}", path.display());
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
