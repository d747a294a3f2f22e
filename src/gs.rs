//! Ghostscript process invocation.
//!
//! ## Why argument arrays, never shell strings?
//!
//! Every invocation — including the page-count query, which embeds a small
//! PostScript program — is built as a structured argv and handed to
//! [`tokio::process::Command`]. Temp-file paths contain whatever the OS
//! temp-name generator produced; passing them through a shell would mean
//! quoting/escaping hazards for zero benefit.
//!
//! The binary path comes in explicitly from [`crate::SessionConfig`];
//! this module never consults `PATH`-mutating globals or environment state.

use crate::error::GhostPdfError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, error};

/// Flags common to every display-less batch invocation.
///
/// `-dPARANOIDSAFER` sandboxes file access inside the interpreter; the
/// QUIET/BATCH/NOPAUSE/NOPROMPT quartet makes gs run start-to-finish with
/// no interactive prompts and nothing but errors on the console.
pub(crate) const BATCH_FLAGS: [&str; 5] = [
    "-dQUIET",
    "-dPARANOIDSAFER",
    "-dBATCH",
    "-dNOPAUSE",
    "-dNOPROMPT",
];

/// One fully-assembled Ghostscript invocation.
#[derive(Debug)]
pub(crate) struct GsInvocation {
    binary: PathBuf,
    args: Vec<OsString>,
}

impl GsInvocation {
    pub(crate) fn new(binary: &Path) -> Self {
        Self {
            binary: binary.to_path_buf(),
            args: Vec::new(),
        }
    }

    pub(crate) fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The assembled argv, for tests and debug logging.
    #[cfg(test)]
    pub(crate) fn argv(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Run Ghostscript to completion and capture its output.
    ///
    /// Spawn failures and nonzero exits both map to invocation errors; the
    /// caller wraps them with the failing operation's name.
    pub(crate) async fn run(self) -> Result<std::process::Output, GhostPdfError> {
        let start = Instant::now();
        debug!(
            binary = %self.binary.display(),
            args = ?self.args,
            "Invoking Ghostscript"
        );

        let output = Command::new(&self.binary)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| GhostPdfError::SpawnFailed {
                binary: self.binary.clone(),
                source: e,
            })?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(
                duration_ms = elapsed_ms,
                exit_code = output.status.code(),
                stderr = %stderr,
                "Ghostscript failed"
            );
            return Err(GhostPdfError::ConverterFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!(duration_ms = elapsed_ms, "Ghostscript completed");
        Ok(output)
    }
}

/// Normalize a path for embedding in a PostScript string literal.
///
/// Ghostscript accepts forward slashes on every platform, and backslashes
/// inside `(...)` literals would start escape sequences.
pub(crate) fn postscript_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
