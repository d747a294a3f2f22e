//! Shrink: lossy recompression via the pdfwrite device.
//!
//! ## The size-safety policy
//!
//! `pdfwrite` can and does *grow* some inputs — a PDF whose images are
//! already below the target DPI gets its streams rewritten with no gain,
//! and font re-embedding can add bytes. After conversion the byte sizes of
//! the original and the new file are compared; unless the new file is
//! strictly smaller, the original's bytes are returned unchanged. Callers
//! therefore get a hard guarantee: shrink output is never larger than its
//! input, at the cost of the operation sometimes being a no-op.

use crate::error::GhostPdfError;
use crate::gs::{GsInvocation, BATCH_FLAGS};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Argument set for recompression.
///
/// `/screen` is the lowest-quality preset; bicubic downsampling for
/// continuous-tone images, subsampling for mono. Auto-rotation is disabled
/// so page orientation survives the rewrite. The grayscale block forces the
/// output colour model to gray and overrides embedded ICC profiles.
fn shrink_args(
    dpi: u32,
    pdf_version: &str,
    grayscale: bool,
    out: &Path,
    input: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = BATCH_FLAGS.iter().map(|s| s.to_string()).collect();
    args.extend([
        "-sDEVICE=pdfwrite".to_string(),
        format!("-dCompatibilityLevel={pdf_version}"),
        "-dPDFSETTINGS=/screen".to_string(),
        "-dEmbedAllFonts=true".to_string(),
        "-dSubsetFonts=true".to_string(),
        "-dAutoRotatePages=/None".to_string(),
        "-dColorImageDownsampleType=/Bicubic".to_string(),
        format!("-dColorImageResolution={dpi}"),
        "-dGrayImageDownsampleType=/Bicubic".to_string(),
        format!("-dGrayImageResolution={dpi}"),
        "-dMonoImageDownsampleType=/Subsample".to_string(),
        format!("-dMonoImageResolution={dpi}"),
    ]);
    if grayscale {
        args.extend([
            "-sProcessColorModel=DeviceGray".to_string(),
            "-sColorConversionStrategy=Gray".to_string(),
            "-dOverrideICC".to_string(),
        ]);
    }
    args.extend([
        format!("-sOutputFile={}", out.display()),
        input.display().to_string(),
    ]);
    args
}

/// Whether the recompressed output should be kept over the original.
///
/// Strictly-smaller only: an equal-size rewrite buys nothing and a larger
/// one violates the operation's contract.
fn keep_shrunk(original_len: u64, shrunk_len: u64) -> bool {
    shrunk_len < original_len
}

/// Recompress the materialized PDF at `input` and return the bytes of
/// whichever file is smaller — the new one, or the unchanged original.
pub(crate) async fn shrink(
    gs_binary: &Path,
    input: &Path,
    dpi: u32,
    pdf_version: &str,
    grayscale: bool,
) -> Result<Vec<u8>, GhostPdfError> {
    let out = NamedTempFile::new()
        .map_err(|e| GhostPdfError::TempFileFailed { source: e })?
        .into_temp_path();

    debug!(dpi, pdf_version, grayscale, "Shrinking PDF");

    let args = shrink_args(dpi, pdf_version, grayscale, &out, input);
    GsInvocation::new(gs_binary)
        .args(args)
        .run()
        .await
        .map_err(|e| GhostPdfError::ShrinkFailed {
            detail: e.to_string(),
        })?;

    let original_len = tokio::fs::metadata(input)
        .await
        .map_err(|e| GhostPdfError::ShrinkFailed {
            detail: format!("original unreadable: {e}"),
        })?
        .len();
    let shrunk_len = tokio::fs::metadata(&out)
        .await
        .map_err(|e| GhostPdfError::ShrinkFailed {
            detail: format!("output unreadable: {e}"),
        })?
        .len();

    let chosen = if keep_shrunk(original_len, shrunk_len) {
        info!(
            original_bytes = original_len,
            shrunk_bytes = shrunk_len,
            "Shrink reduced file size"
        );
        out.to_path_buf()
    } else {
        info!(
            original_bytes = original_len,
            shrunk_bytes = shrunk_len,
            "Shrink did not reduce size; returning original"
        );
        input.to_path_buf()
    };

    let bytes = tokio::fs::read(&chosen)
        .await
        .map_err(|e| GhostPdfError::ShrinkFailed {
            detail: format!("result unreadable: {e}"),
        })?;

    Ok(bytes)
    // `out` dropped here; the operation-scoped temp file is removed
    // regardless of which branch was returned.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_args_match_invocation_contract() {
        let args = shrink_args(300, "1.5", false, Path::new("/t/o.pdf"), Path::new("/t/i.pdf"));
        assert_eq!(
            args,
            vec![
                "-dQUIET",
                "-dPARANOIDSAFER",
                "-dBATCH",
                "-dNOPAUSE",
                "-dNOPROMPT",
                "-sDEVICE=pdfwrite",
                "-dCompatibilityLevel=1.5",
                "-dPDFSETTINGS=/screen",
                "-dEmbedAllFonts=true",
                "-dSubsetFonts=true",
                "-dAutoRotatePages=/None",
                "-dColorImageDownsampleType=/Bicubic",
                "-dColorImageResolution=300",
                "-dGrayImageDownsampleType=/Bicubic",
                "-dGrayImageResolution=300",
                "-dMonoImageDownsampleType=/Subsample",
                "-dMonoImageResolution=300",
                "-sOutputFile=/t/o.pdf",
                "/t/i.pdf",
            ]
        );
    }

    #[test]
    fn grayscale_adds_colour_override_block() {
        let args = shrink_args(72, "1.4", true, Path::new("o.pdf"), Path::new("i.pdf"));
        let gray_pos = args
            .iter()
            .position(|a| a == "-sProcessColorModel=DeviceGray")
            .expect("grayscale flag missing");
        assert_eq!(args[gray_pos + 1], "-sColorConversionStrategy=Gray");
        assert_eq!(args[gray_pos + 2], "-dOverrideICC");
        // the override block sits before the output/input pair
        assert!(args[gray_pos + 3].starts_with("-sOutputFile="));
    }

    #[test]
    fn non_grayscale_has_no_colour_overrides() {
        let args = shrink_args(72, "1.4", false, Path::new("o.pdf"), Path::new("i.pdf"));
        assert!(!args.iter().any(|a| a.contains("DeviceGray")));
        assert!(!args.iter().any(|a| a == "-dOverrideICC"));
    }

    #[test]
    fn size_policy_keeps_only_strictly_smaller() {
        assert!(keep_shrunk(1000, 999));
        assert!(!keep_shrunk(1000, 1000));
        assert!(!keep_shrunk(1000, 1001));
        assert!(!keep_shrunk(0, 0));
    }
}
