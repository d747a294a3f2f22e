//! Input sources: where a session's PDF comes from.
//!
//! Ghostscript only operates on filesystem paths, so every source kind is
//! eventually materialized to a temp file (see [`crate::session`]). This
//! module only classifies the input; it performs no I/O.

use std::path::PathBuf;

/// The origin of a session's PDF content.
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// Raw PDF bytes already in memory.
    Bytes(Vec<u8>),
    /// A local filesystem path.
    Path(PathBuf),
    /// An HTTP or HTTPS URL to download.
    Url(String),
}

impl PdfSource {
    /// Classify a user-supplied string as a URL or a local path.
    ///
    /// Detection is a plain prefix match on `http://` / `https://` — any
    /// other string, existing or not, is treated as a local path (missing
    /// files fail later, at materialization).
    pub fn from_input(input: &str) -> Self {
        if is_url(input) {
            PdfSource::Url(input.to_string())
        } else {
            PdfSource::Path(PathBuf::from(input))
        }
    }

    /// Short label for log lines; never includes raw bytes.
    pub(crate) fn describe(&self) -> String {
        match self {
            PdfSource::Bytes(b) => format!("<{} bytes in memory>", b.len()),
            PdfSource::Path(p) => p.display().to_string(),
            PdfSource::Url(u) => u.clone(),
        }
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(bytes: Vec<u8>) -> Self {
        PdfSource::Bytes(bytes)
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        PdfSource::Path(path)
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
