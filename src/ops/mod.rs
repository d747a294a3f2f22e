//! The four Ghostscript-backed operations.
//!
//! Each submodule owns exactly one operation's argument set and result
//! parsing, keeping the converter's invocation contract in one auditable
//! place per operation:
//!
//! 1. [`extract`] — rasterize a single page to a true-colour PNG
//! 2. [`shrink`]  — recompress/downsample, with the never-grow size policy
//! 3. [`inspect`] — version query (header scan, no gs) and page-count
//!    query (gs scripting mode)
//!
//! All of them operate on the session's already-materialized file; none of
//! them touch the session temp file other than reading it.

pub(crate) mod extract;
pub(crate) mod inspect;
pub(crate) mod shrink;
