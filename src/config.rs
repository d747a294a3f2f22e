//! Configuration types for Ghostscript sessions.
//!
//! All session behaviour is controlled through [`SessionConfig`], built via
//! its [`SessionConfigBuilder`]. The Ghostscript binary is resolved exactly
//! once, at construction, into an immutable path that every invocation
//! receives explicitly — no process-wide search-path mutation, ever.

use crate::error::GhostPdfError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default DPI for page-image extraction.
pub const DEFAULT_EXTRACT_DPI: u32 = 600;

/// Default DPI for shrink downsampling (colour, gray, and mono alike).
pub const DEFAULT_SHRINK_DPI: u32 = 300;

/// Configuration for a [`crate::Session`].
///
/// Built via [`SessionConfig::builder()`] or [`SessionConfig::default()`].
///
/// # Example
/// ```rust
/// use ghostpdf::SessionConfig;
///
/// let config = SessionConfig::builder()
///     .extract_dpi(300)
///     .gs_binary("/opt/ghostscript/bin/gs")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Resolved path of the Ghostscript binary invoked for every operation.
    ///
    /// Resolution order at build time: explicit [`SessionConfigBuilder::gs_binary`]
    /// override → `GHOSTPDF_GS` environment variable → platform default
    /// (`gswin64c` on Windows, `gs` elsewhere, found via `PATH`).
    pub gs_binary: PathBuf,

    /// DPI used by [`crate::Session::page_image`] when the caller passes no
    /// per-call override. Default: 600.
    ///
    /// 600 DPI yields print-quality rasters; drop to 150–300 for thumbnails
    /// or previews where render time and PNG size matter more.
    pub extract_dpi: u32,

    /// DPI used by [`crate::Session::shrink`] when [`ShrinkOptions::dpi`]
    /// is unset. Applied uniformly to colour, grayscale, and monochrome
    /// image downsampling. Default: 300.
    pub shrink_dpi: u32,

    /// Download timeout for URL sources, in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gs_binary: resolve_gs_binary(None),
            extract_dpi: DEFAULT_EXTRACT_DPI,
            shrink_dpi: DEFAULT_SHRINK_DPI,
            download_timeout_secs: 120,
        }
    }
}

impl SessionConfig {
    /// Create a new builder for `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Override the Ghostscript binary path.
    pub fn gs_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.gs_binary = resolve_gs_binary(Some(path.into()));
        self
    }

    pub fn extract_dpi(mut self, dpi: u32) -> Self {
        self.config.extract_dpi = dpi;
        self
    }

    pub fn shrink_dpi(mut self, dpi: u32) -> Self {
        self.config.shrink_dpi = dpi;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SessionConfig, GhostPdfError> {
        let c = &self.config;
        if c.extract_dpi < 18 || c.extract_dpi > 2400 {
            return Err(GhostPdfError::InvalidConfig(format!(
                "extract DPI must be 18–2400, got {}",
                c.extract_dpi
            )));
        }
        if c.shrink_dpi < 18 || c.shrink_dpi > 2400 {
            return Err(GhostPdfError::InvalidConfig(format!(
                "shrink DPI must be 18–2400, got {}",
                c.shrink_dpi
            )));
        }
        if c.download_timeout_secs == 0 {
            return Err(GhostPdfError::InvalidConfig(
                "download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Resolve the Ghostscript binary path once, at configuration time.
fn resolve_gs_binary(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(env_path) = std::env::var("GHOSTPDF_GS") {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }
    PathBuf::from(default_gs_name())
}

#[cfg(windows)]
fn default_gs_name() -> &'static str {
    "gswin64c"
}

#[cfg(not(windows))]
fn default_gs_name() -> &'static str {
    "gs"
}

// ── Per-call options ─────────────────────────────────────────────────────

/// Options for [`crate::Session::shrink`]. All fields are optional with
/// defaults, so `ShrinkOptions::default()` gives the stock recompression.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShrinkOptions {
    /// Target DPI for image downsampling. `None` → [`SessionConfig::shrink_dpi`].
    pub dpi: Option<u32>,

    /// Compatibility level the output PDF declares, e.g. `"1.4"`.
    /// `None` → the session's own detected version (see
    /// [`crate::Session::pdf_version`]).
    pub pdf_version: Option<String>,

    /// Convert the output to grayscale, overriding embedded ICC profiles.
    pub grayscale: bool,
}

impl ShrinkOptions {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = Some(version.into());
        self
    }

    pub fn grayscale(mut self, v: bool) -> Self {
        self.grayscale = v;
        self
    }
}
