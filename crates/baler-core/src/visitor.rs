//! Deletion visitors invoked for files that made it into an archive.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::model::FileAttributes;

/// Receives each archived file once the archive is safely on disk.
///
/// Implementations decide what removal means; the caller owns failure
/// handling and keeps iterating when a visit fails.
pub trait DeleteVisitor: Send + Sync {
    /// Handle one archived file.
    ///
    /// # Errors
    ///
    /// Returns the underlying io error when the file cannot be handled;
    /// the caller treats this as a per-file failure, not a cycle failure.
    fn visit(&self, path: &Path, attributes: &FileAttributes) -> io::Result<()>;

    /// Notification for a failed [`visit`](DeleteVisitor::visit) call.
    fn visit_failed(&self, _path: &Path, _error: &io::Error) {}
}

/// Production visitor that unlinks archived files.
///
/// In test mode the visitor reports what it would remove and leaves the
/// filesystem untouched; archives are still written by the caller.
#[derive(Clone, Copy, Debug)]
pub struct DeletingVisitor {
    test_mode: bool,
}

impl DeletingVisitor {
    /// Visitor that really removes files.
    #[must_use]
    pub const fn new() -> Self {
        Self { test_mode: false }
    }

    /// Visitor that only logs what it would remove.
    #[must_use]
    pub const fn test_mode() -> Self {
        Self { test_mode: true }
    }

    /// Whether this visitor suppresses removals.
    #[must_use]
    pub const fn is_test_mode(&self) -> bool {
        self.test_mode
    }
}

impl Default for DeletingVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteVisitor for DeletingVisitor {
    fn visit(&self, path: &Path, _attributes: &FileAttributes) -> io::Result<()> {
        if self.test_mode {
            info!(path = %path.display(), "test mode, keeping file");
            return Ok(());
        }
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;
    use anyhow::Result;
    use chrono::Utc;

    fn attributes() -> FileAttributes {
        FileAttributes {
            size: 0,
            modified: Utc::now(),
            kind: FileKind::File,
        }
    }

    #[test]
    fn removes_files_by_default() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("app.log");
        std::fs::write(&path, b"contents")?;

        DeletingVisitor::new().visit(&path, &attributes())?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_mode_keeps_files() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("app.log");
        std::fs::write(&path, b"contents")?;

        let visitor = DeletingVisitor::test_mode();
        assert!(visitor.is_test_mode());
        visitor.visit(&path, &attributes())?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn missing_files_surface_the_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("absent.log");
        let err = DeletingVisitor::new()
            .visit(&missing, &attributes())
            .expect_err("remove should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
