//! # ghostpdf
//!
//! Rasterize, shrink, and inspect PDFs through an external Ghostscript
//! binary.
//!
//! ## Why shell out to Ghostscript?
//!
//! Decades of PDF edge-cases live inside Ghostscript's interpreter; no
//! in-process library matches its tolerance for the malformed files that
//! turn up in real document pipelines. The trade-off is that gs only works
//! on filesystem paths, so this crate's job is mostly lifecycle: get the
//! caller's PDF (bytes, path, or URL) onto disk exactly once per
//! [`Session`], build the right argument set per operation, and clean
//! every temp file up again.
//!
//! ## Operations
//!
//! ```text
//! source (bytes | path | URL)
//!   │
//!   ├─ materialize   one temp file per session, idempotent
//!   │
//!   ├─ page_image    gs -sDEVICE=png16m …      → PNG bytes
//!   ├─ shrink        gs -sDEVICE=pdfwrite …    → PDF bytes (never larger)
//!   ├─ pdf_version   header scan, no gs        → "1.4"-style string
//!   └─ page_count    gs -dNODISPLAY script     → Option<u32>
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghostpdf::{Session, SessionConfig, ShrinkOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::from_input(
//!         "https://example.com/report.pdf",
//!         SessionConfig::default(),
//!     );
//!
//!     println!("version: {}", session.pdf_version().await?);
//!     println!("pages:   {:?}", session.page_count().await?);
//!
//!     let smaller = session.shrink(&ShrinkOptions::default().dpi(150)).await?;
//!     std::fs::write("report-small.pdf", smaller)?;
//!
//!     session.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ghostpdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ghostpdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cleanup;
pub mod config;
pub mod error;
pub mod session;
pub mod source;

mod gs;
mod ops;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SessionConfig, SessionConfigBuilder, ShrinkOptions, DEFAULT_EXTRACT_DPI, DEFAULT_SHRINK_DPI};
pub use error::GhostPdfError;
pub use session::Session;
pub use source::{is_url, PdfSource};
