//! Delete visitors that record what happened for assertions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use baler_core::{DeleteVisitor, FileAttributes};

/// Visitor that records every visit and can simulate per-file failures.
///
/// By default visited files are left in place; [`deleting`](Self::deleting)
/// builds a visitor that removes them like the production one would.
#[derive(Default)]
pub struct RecordingVisitor {
    delete: bool,
    fail_on: Vec<PathBuf>,
    visited: Mutex<Vec<PathBuf>>,
    failures: Mutex<Vec<PathBuf>>,
}

impl RecordingVisitor {
    /// Visitor that records visits without touching the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visitor that records visits and removes the visited files.
    #[must_use]
    pub fn deleting() -> Self {
        Self {
            delete: true,
            ..Self::default()
        }
    }

    /// Fail visits of `path` with a permission error.
    #[must_use]
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_on.push(path.into());
        self
    }

    /// Paths visited so far, in visit order.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    #[must_use]
    pub fn visited(&self) -> Vec<PathBuf> {
        self.visited.lock().expect("visited lock").clone()
    }

    /// Paths whose visit failed, in failure order.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    #[must_use]
    pub fn failures(&self) -> Vec<PathBuf> {
        self.failures.lock().expect("failures lock").clone()
    }
}

impl DeleteVisitor for RecordingVisitor {
    fn visit(&self, path: &Path, _attributes: &FileAttributes) -> io::Result<()> {
        self.visited
            .lock()
            .expect("visited lock")
            .push(path.to_path_buf());
        if self.fail_on.iter().any(|candidate| candidate == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "refused by test visitor",
            ));
        }
        if self.delete {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn visit_failed(&self, path: &Path, _error: &io::Error) {
        self.failures
            .lock()
            .expect("failures lock")
            .push(path.to_path_buf());
    }
}
