//! Process-wide safety net for temporary files.
//!
//! Primary cleanup is RAII: every session and operation temp file is held
//! as a [`tempfile::TempPath`] whose drop deletes it. This registry exists
//! for the paths that outlive their owner anyway — a long-lived `Session`
//! leaked into a static, a panic unwound across FFI — and lets an
//! embedding application (the CLI does this before exiting) sweep whatever
//! is still tracked. It is best-effort and secondary by design.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// A set of live temp paths, swept on demand.
struct Registry {
    paths: Mutex<HashSet<PathBuf>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            paths: Mutex::new(HashSet::new()),
        }
    }

    fn register(&self, path: &Path) {
        self.paths
            .lock()
            .expect("temp-path registry poisoned")
            .insert(path.to_path_buf());
    }

    fn deregister(&self, path: &Path) {
        self.paths
            .lock()
            .expect("temp-path registry poisoned")
            .remove(path);
    }

    fn sweep(&self) -> usize {
        let paths: Vec<PathBuf> = {
            let mut guard = self.paths.lock().expect("temp-path registry poisoned");
            guard.drain().collect()
        };

        let mut removed = 0;
        for path in paths {
            if std::fs::remove_file(&path).is_ok() {
                debug!(path = %path.display(), "Swept orphaned temp file");
                removed += 1;
            }
        }
        removed
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Track a temp path for the exit-time sweep.
pub(crate) fn register(path: &Path) {
    GLOBAL.register(path);
}

/// Stop tracking a path (its owner deleted it, or is about to).
pub(crate) fn deregister(path: &Path) {
    GLOBAL.deregister(path);
}

/// Remove every still-tracked temp file, best-effort.
///
/// Returns the number of files actually deleted. Missing files (already
/// cleaned up through the normal RAII path) are not an error.
pub fn sweep() -> usize {
    GLOBAL.sweep()
}
