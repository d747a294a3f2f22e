//! Error types for the ghostpdf library.
//!
//! Every fallible stage has its own variant so callers can see *which*
//! stage failed without parsing message strings: materialization (getting
//! the source onto disk), invocation (spawning/running Ghostscript), and
//! the per-operation wrappers. Nothing fails silently and nothing is
//! retried automatically — transient network or process failures surface
//! directly so callers can apply their own retry policy.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ghostpdf library.
#[derive(Debug, Error)]
pub enum GhostPdfError {
    // ── Materialization errors ────────────────────────────────────────────
    /// Could not allocate the session's temporary file.
    #[error("Failed to allocate a temporary file: {source}")]
    TempFileFailed {
        #[source]
        source: std::io::Error,
    },

    /// Local source file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Copying a local source into the session temp file failed.
    #[error("Failed to copy '{path}' into the session temp file: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP URL was syntactically valid but the download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Writing an in-memory byte source to the session temp file failed.
    #[error("Failed to write PDF bytes to the session temp file: {source}")]
    BufferWriteFailed {
        #[source]
        source: std::io::Error,
    },

    // ── Invocation errors ─────────────────────────────────────────────────
    /// The Ghostscript binary could not be spawned at all.
    #[error(
        "Failed to execute Ghostscript at '{binary}': {source}\n\
         Install Ghostscript or point GHOSTPDF_GS at the binary."
    )]
    SpawnFailed {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ghostscript ran but exited with a failure status.
    #[error("Ghostscript exited with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    // ── Operation errors ──────────────────────────────────────────────────
    /// Page-image extraction failed (bad page, device error, unreadable output).
    #[error("Page image extraction failed for page {page}: {detail}")]
    PageImageFailed { page: u32, detail: String },

    /// Shrink (recompression) failed.
    #[error("PDF shrink failed: {detail}")]
    ShrinkFailed { detail: String },

    /// Reading the file header for the version query failed.
    #[error("Failed to retrieve PDF version: {detail}")]
    VersionFailed { detail: String },

    /// The page-count invocation itself failed (parse leniency is separate;
    /// unparsable-but-successful output is `Ok(None)`, not this error).
    #[error("Failed to retrieve page count: {detail}")]
    PageCountFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converter_failed_display_carries_stderr() {
        let e = GhostPdfError::ConverterFailed {
            status: "exit status: 1".into(),
            stderr: "Unrecoverable error: rangecheck".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("rangecheck"), "got: {msg}");
    }

    #[test]
    fn page_image_display_names_page() {
        let e = GhostPdfError::PageImageFailed {
            page: 7,
            detail: "device init failed".into(),
        };
        assert!(e.to_string().contains("page 7"));
    }

    #[test]
    fn spawn_failed_mentions_env_override() {
        let e = GhostPdfError::SpawnFailed {
            binary: PathBuf::from("gs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("GHOSTPDF_GS"));
    }
}
