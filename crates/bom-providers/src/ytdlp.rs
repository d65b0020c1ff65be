//! Media fetching through the `yt-dlp` command-line tool
//!
//! Two invocations per locator: `--dump-single-json` for the info dict, then
//! a download of the selected audio format streamed to stdout. Both share
//! one deadline; a child still running when it passes is killed.

use crate::FetchError;
use bom_domain::{FetchedMedia, MediaFetcher, MediaMetadata};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

/// Default executable name
pub const DEFAULT_BINARY: &str = "yt-dlp";

/// Default format selector
pub const DEFAULT_FORMAT: &str = "bestaudio";

const STDERR_TAIL: usize = 400;

/// Fetcher backed by a `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
    format: String,
}

impl YtDlpFetcher {
    /// Use the given executable with the default format selector
    pub fn new(binary: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// Override the format selector (e.g. `bestaudio[ext=m4a]`)
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    async fn run(
        &self,
        args: &[&str],
        deadline: Instant,
        budget: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FetchError::ToolMissing(format!("{}: {}", self.binary.display(), e)))?;

        // Dropping the pending wait drops the child, which kills it
        let remaining = deadline.saturating_duration_since(Instant::now());
        let output = match timeout(remaining, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| FetchError::Failed {
                status: "no exit status".to_string(),
                stderr: e.to_string(),
            })?,
            Err(_) => {
                warn!("Killed {} after {}s", self.binary.display(), budget.as_secs());
                return Err(FetchError::TimedOut(budget.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let tail_start = stderr
                .char_indices()
                .rev()
                .nth(STDERR_TAIL)
                .map(|(i, _)| i)
                .unwrap_or(0);
            return Err(FetchError::Failed {
                status: output.status.to_string(),
                stderr: stderr[tail_start..].to_string(),
            });
        }

        Ok(output.stdout)
    }

    async fn fetch_async(
        &self,
        locator: &str,
        budget: Duration,
    ) -> Result<FetchedMedia, FetchError> {
        let deadline = Instant::now() + budget;

        debug!("yt-dlp metadata for {}", locator);
        let info = self
            .run(
                &[
                    "--dump-single-json",
                    "--no-playlist",
                    "--no-warnings",
                    "-f",
                    self.format.as_str(),
                    locator,
                ],
                deadline,
                budget,
            )
            .await?;
        let mut metadata: MediaMetadata = serde_json::from_slice(&info)
            .map_err(|e| FetchError::InvalidMetadata(e.to_string()))?;

        debug!("yt-dlp download for {}", locator);
        let bytes = self
            .run(
                &[
                    "--no-playlist",
                    "--no-warnings",
                    "--quiet",
                    "-f",
                    self.format.as_str(),
                    "-o",
                    "-",
                    locator,
                ],
                deadline,
                budget,
            )
            .await?;

        if metadata.filesize.is_none() {
            metadata.filesize = Some(bytes.len() as u64);
        }

        Ok(FetchedMedia { bytes, metadata })
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl MediaFetcher for YtDlpFetcher {
    type Error = FetchError;

    fn fetch(&self, locator: &str, timeout: Duration) -> Result<FetchedMedia, Self::Error> {
        // Blocking wrapper for the async call
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Unavailable(format!("Failed to start runtime: {}", e)))?
            .block_on(self.fetch_async(locator, timeout))
    }
}
