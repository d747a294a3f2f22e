//! Page-image extraction: rasterize one page to an in-memory PNG.

use crate::error::GhostPdfError;
use crate::gs::{GsInvocation, BATCH_FLAGS};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Argument set for rasterizing a single page.
///
/// `png16m` is the 24-bit true-colour PNG device; 4-bit alpha on text and
/// graphics gives 16-level anti-aliasing. First and last page are both the
/// requested page, so exactly one image lands at `out`.
fn extraction_args(page: u32, dpi: u32, out: &Path, input: &Path) -> Vec<String> {
    let mut args: Vec<String> = BATCH_FLAGS.iter().map(|s| s.to_string()).collect();
    args.extend([
        "-sDEVICE=png16m".to_string(),
        "-dTextAlphaBits=4".to_string(),
        "-dGraphicsAlphaBits=4".to_string(),
        format!("-r{dpi}"),
        format!("-dFirstPage={page}"),
        format!("-dLastPage={page}"),
        format!("-sOutputFile={}", out.display()),
        input.display().to_string(),
    ]);
    args
}

/// Rasterize `page` (1-based) of the materialized PDF at `input` and return
/// the PNG bytes.
///
/// Page numbers are not validated locally: an out-of-range page is
/// Ghostscript's error to report, and it arrives wrapped like any other
/// converter failure. The operation-scoped output file is removed before
/// returning, on success and failure alike.
pub(crate) async fn page_image(
    gs_binary: &Path,
    input: &Path,
    page: u32,
    dpi: u32,
) -> Result<Vec<u8>, GhostPdfError> {
    let out = NamedTempFile::new()
        .map_err(|e| GhostPdfError::TempFileFailed { source: e })?
        .into_temp_path();

    debug!(page, dpi, out = %out.display(), "Extracting page image");

    let args = extraction_args(page, dpi, &out, input);
    GsInvocation::new(gs_binary)
        .args(args)
        .run()
        .await
        .map_err(|e| GhostPdfError::PageImageFailed {
            page,
            detail: e.to_string(),
        })?;

    let bytes = tokio::fs::read(&out)
        .await
        .map_err(|e| GhostPdfError::PageImageFailed {
            page,
            detail: format!("output image unreadable: {e}"),
        })?;

    debug!(page, size_bytes = bytes.len(), "Page image extracted");
    Ok(bytes)
    // `out` dropped here; the TempPath deletes the scratch PNG.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_args_match_invocation_contract() {
        let args = extraction_args(3, 600, Path::new("/tmp/out.png"), Path::new("/tmp/in.pdf"));
        assert_eq!(
            args,
            vec![
                "-dQUIET",
                "-dPARANOIDSAFER",
                "-dBATCH",
                "-dNOPAUSE",
                "-dNOPROMPT",
                "-sDEVICE=png16m",
                "-dTextAlphaBits=4",
                "-dGraphicsAlphaBits=4",
                "-r600",
                "-dFirstPage=3",
                "-dLastPage=3",
                "-sOutputFile=/tmp/out.png",
                "/tmp/in.pdf",
            ]
        );
    }

    #[test]
    fn input_path_is_the_sole_positional_argument() {
        let args = extraction_args(1, 150, Path::new("o.png"), Path::new("i.pdf"));
        let positionals: Vec<&String> = args.iter().filter(|a| !a.starts_with('-')).collect();
        assert_eq!(positionals, vec!["i.pdf"]);
    }
}
