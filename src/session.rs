//! Conversion sessions: one source, one temp file, four operations.
//!
//! ## Why materialize to a temp file?
//!
//! Ghostscript only operates on filesystem paths — it cannot read from a
//! byte buffer or a socket. A session therefore copies its source (bytes,
//! local file, or URL) into a single [`tempfile`]-managed file on the first
//! operation and reuses it for every operation after that. The temp file
//! lives until [`Session::dispose`] or drop, whichever comes first, and is
//! additionally tracked by [`crate::cleanup`] as an exit-time safety net.
//!
//! ## State machine
//!
//! ```text
//! Unmaterialized ──first op──▶ Materialized(path) ──dispose()──▶ Disposed
//!        ▲                                                          │
//!        └────────────── next op re-materializes ◀──────────────────┘
//! ```
//!
//! Re-materialization after disposal is allowed and not an error; the
//! session simply allocates a fresh temp file from the same source.
//!
//! ## Concurrency
//!
//! Every operation takes `&mut self`, so two operations on one session
//! cannot overlap — the compiler enforces what would otherwise be a
//! first-materialization race. Distinct sessions are fully independent and
//! may run concurrently; each owns disjoint temp files.

use crate::cleanup;
use crate::config::{SessionConfig, ShrinkOptions};
use crate::error::GhostPdfError;
use crate::ops::{extract, inspect, shrink};
use crate::source::PdfSource;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

enum MaterializeState {
    Unmaterialized,
    Materialized(TempPath),
    Disposed,
}

/// A Ghostscript conversion session bound to a single PDF source.
///
/// # Example
/// ```rust,no_run
/// use ghostpdf::{Session, SessionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::from_input("document.pdf", SessionConfig::default());
/// let pages = session.page_count().await?;
/// let png = session.page_image(1, None).await?;
/// session.dispose();
/// # Ok(())
/// # }
/// ```
pub struct Session {
    source: PdfSource,
    config: SessionConfig,
    state: MaterializeState,
}

impl Session {
    /// Create a session from any [`PdfSource`].
    pub fn new(source: impl Into<PdfSource>, config: SessionConfig) -> Self {
        Self {
            source: source.into(),
            config,
            state: MaterializeState::Unmaterialized,
        }
    }

    /// Create a session from a user-supplied string, auto-detecting URL
    /// versus local path.
    pub fn from_input(input: &str, config: SessionConfig) -> Self {
        Self::new(PdfSource::from_input(input), config)
    }

    /// The session's materialized temp-file path, if any.
    ///
    /// `None` before the first operation and after [`Session::dispose`].
    pub fn materialized_path(&self) -> Option<&Path> {
        match &self.state {
            MaterializeState::Materialized(p) => Some(p),
            _ => None,
        }
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Rasterize one page (1-based) to a true-colour PNG.
    ///
    /// `dpi` of `None` uses [`SessionConfig::extract_dpi`]. Out-of-range
    /// pages are rejected by Ghostscript, not validated here.
    pub async fn page_image(
        &mut self,
        page: u32,
        dpi: Option<u32>,
    ) -> Result<Vec<u8>, GhostPdfError> {
        let input = self.materialize().await?;
        let dpi = dpi.unwrap_or(self.config.extract_dpi);
        extract::page_image(&self.config.gs_binary, &input, page, dpi).await
    }

    /// Recompress the PDF, never returning output larger than the input.
    ///
    /// When [`ShrinkOptions::pdf_version`] is unset, the session's own
    /// detected version (see [`Session::pdf_version`]) is used as the
    /// output compatibility level.
    pub async fn shrink(&mut self, options: &ShrinkOptions) -> Result<Vec<u8>, GhostPdfError> {
        let version = match &options.pdf_version {
            Some(v) => v.clone(),
            None => self.pdf_version().await?,
        };
        let input = self.materialize().await?;
        let dpi = options.dpi.unwrap_or(self.config.shrink_dpi);
        shrink::shrink(
            &self.config.gs_binary,
            &input,
            dpi,
            &version,
            options.grayscale,
        )
        .await
    }

    /// Read the declared `%PDF-x.y` version from the file header.
    ///
    /// Scans only the first 1025 bytes; returns `"1.4"` when no tag is
    /// found there, even if one exists deeper in the file.
    pub async fn pdf_version(&mut self) -> Result<String, GhostPdfError> {
        let input = self.materialize().await?;
        inspect::pdf_version(&input).await
    }

    /// Count pages via Ghostscript's scripting mode.
    ///
    /// `Ok(None)` means the converter ran successfully but printed nothing
    /// numeric — deliberately lenient, callers inspect the value.
    pub async fn page_count(&mut self) -> Result<Option<u32>, GhostPdfError> {
        let input = self.materialize().await?;
        inspect::page_count(&self.config.gs_binary, &input).await
    }

    /// Delete the session's temp file and clear the reference.
    ///
    /// Idempotent. A later operation re-materializes from the original
    /// source rather than failing.
    pub fn dispose(&mut self) {
        if let MaterializeState::Materialized(path) =
            std::mem::replace(&mut self.state, MaterializeState::Disposed)
        {
            cleanup::deregister(&path);
            debug!(path = %path.display(), "Disposing session temp file");
            // TempPath drop removes the file.
        }
    }

    // ── Materialization ───────────────────────────────────────────────────

    /// Ensure the source exists on disk; idempotent.
    ///
    /// Returns an owned path so operations can borrow `self.config` freely
    /// afterwards. On any failure no temp-file reference is retained.
    async fn materialize(&mut self) -> Result<PathBuf, GhostPdfError> {
        if let MaterializeState::Materialized(path) = &self.state {
            return Ok(path.to_path_buf());
        }

        debug!(source = %self.source.describe(), "Materializing PDF source");

        let temp = NamedTempFile::new()
            .map_err(|e| GhostPdfError::TempFileFailed { source: e })?
            .into_temp_path();

        match &self.source {
            PdfSource::Bytes(bytes) => {
                tokio::fs::write(&temp, bytes)
                    .await
                    .map_err(|e| GhostPdfError::BufferWriteFailed { source: e })?;
            }
            PdfSource::Path(path) => {
                if !path.exists() {
                    return Err(GhostPdfError::FileNotFound { path: path.clone() });
                }
                tokio::fs::copy(path, &temp)
                    .await
                    .map_err(|e| GhostPdfError::CopyFailed {
                        path: path.clone(),
                        source: e,
                    })?;
            }
            PdfSource::Url(url) => {
                download_to(url, &temp, self.config.download_timeout_secs).await?;
            }
        }

        cleanup::register(&temp);
        info!(path = %temp.display(), "PDF source materialized");
        let path = temp.to_path_buf();
        self.state = MaterializeState::Materialized(temp);
        Ok(path)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The TempPath inside the state deletes the file itself; this only
        // keeps the exit-sweep registry from holding a stale entry.
        if let MaterializeState::Materialized(path) = &self.state {
            cleanup::deregister(path);
        }
    }
}

/// Stream-fetch `url` into `dest`.
///
/// Any transport failure, non-success status, or write failure becomes a
/// materialization error; the partially-written temp file is reclaimed by
/// the caller's `TempPath`.
async fn download_to(url: &str, dest: &Path, timeout_secs: u64) -> Result<(), GhostPdfError> {
    info!("Downloading PDF from: {}", url);

    let fail = |reason: String| GhostPdfError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| fail(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fail(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| fail(format!("temp file open: {e}")))?;

    let mut stream = response.bytes_stream();
    let mut total = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| fail(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| fail(format!("temp file write: {e}")))?;
        total += chunk.len();
    }
    file.flush()
        .await
        .map_err(|e| fail(format!("temp file flush: {e}")))?;

    info!(bytes = total, "Downloaded to: {}", dest.display());
    Ok(())
}
