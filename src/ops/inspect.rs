//! Inspection: declared PDF version and page count.
//!
//! The two queries could hardly be more different. The version lives in the
//! first kilobyte of the file by specification, so it is a plain header
//! read with a regex — no converter involved. The page count requires real
//! PDF parsing, which is delegated to Ghostscript's PostScript runtime in
//! non-display scripting mode.

use crate::error::GhostPdfError;
use crate::gs::{postscript_path, GsInvocation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Version returned when no tag is found in the header window.
pub const FALLBACK_PDF_VERSION: &str = "1.4";

/// How much of the file head is scanned for the version tag. Tags appear
/// within the first kilobyte in well-formed files; scanning further would
/// only ever match garbage.
const VERSION_SCAN_BYTES: usize = 1025;

// The `.` is deliberately unescaped: it matches any single character, not
// only a literal dot. Tightening it would change which malformed headers
// fall through to the fallback, so it stays loose.
static VERSION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%PDF-\d.\d").expect("version pattern is valid"));

/// Extract the version token from a header window.
///
/// First match wins; the token after the `-` is returned trimmed. No match
/// yields [`FALLBACK_PDF_VERSION`] — even if a valid tag exists later in
/// the file, beyond the scan window.
fn parse_version(header: &str) -> String {
    match VERSION_TAG.find(header) {
        Some(m) => m
            .as_str()
            .split('-')
            .next_back()
            .unwrap_or(FALLBACK_PDF_VERSION)
            .trim()
            .to_string(),
        None => FALLBACK_PDF_VERSION.to_string(),
    }
}

/// Read the declared version of the materialized PDF at `input`.
pub(crate) async fn pdf_version(input: &Path) -> Result<String, GhostPdfError> {
    let mut file = tokio::fs::File::open(input)
        .await
        .map_err(|e| GhostPdfError::VersionFailed {
            detail: e.to_string(),
        })?;

    let mut buf = vec![0u8; VERSION_SCAN_BYTES];
    let mut filled = 0;
    // Loop until the window is full or the file ends; a single read may
    // legally return short.
    loop {
        let n = file
            .read(&mut buf[filled..])
            .await
            .map_err(|e| GhostPdfError::VersionFailed {
                detail: e.to_string(),
            })?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == buf.len() {
            break;
        }
    }
    buf.truncate(filled);

    let header = String::from_utf8_lossy(&buf);
    let version = parse_version(&header);
    debug!(%version, "Detected PDF version");
    Ok(version)
}

/// Strip everything but ASCII digits and parse.
///
/// Ghostscript's scripting output is free text with the count embedded; any
/// warnings it prints around the number are discarded by the digit filter.
/// `None` means the process succeeded but emitted no digits at all — the
/// caller can detect that by value inspection rather than error handling.
fn parse_page_count(stdout: &str) -> Option<u32> {
    let digits: String = stdout.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Count the pages of the materialized PDF at `input` by running
/// Ghostscript's PDF traversal from a tiny embedded PostScript program.
///
/// The program opens the file read-only, begins PDF page traversal, writes
/// the page count to stdout (`=`) and quits. `-dNOSAFER` is required: the
/// script itself opens a file, which SAFER mode would forbid.
pub(crate) async fn page_count(
    gs_binary: &Path,
    input: &Path,
) -> Result<Option<u32>, GhostPdfError> {
    let script = format!(
        "({}) (r) file runpdfbegin pdfpagecount = quit",
        postscript_path(input)
    );

    let output = GsInvocation::new(gs_binary)
        .args(["-dNODISPLAY", "-dNOSAFER", "-q", "-c"])
        .arg(script)
        .run()
        .await
        .map_err(|e| GhostPdfError::PageCountFailed {
            detail: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let count = parse_page_count(&stdout);
    debug!(?count, raw = %stdout.trim(), "Parsed page count");
    Ok(count)
}
