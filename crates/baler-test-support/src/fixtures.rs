//! Temporary log directory fixtures.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// Temporary directory populated with log files for a single test.
///
/// The directory and everything under it is removed on drop.
pub struct LogTree {
    root: TempDir,
}

impl LogTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let root = tempfile::Builder::new().prefix("baler-").tempdir()?;
        Ok(Self { root })
    }

    /// Base directory of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `contents` to `relative`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory or the file cannot be written.
    pub fn file(&self, relative: impl AsRef<Path>, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Like [`file`](Self::file), then back-dates the modification time by
    /// `age_days` days.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written or its timestamp
    /// cannot be changed.
    pub fn aged_file(
        &self,
        relative: impl AsRef<Path>,
        contents: &[u8],
        age_days: u64,
    ) -> io::Result<PathBuf> {
        let path = self.file(relative, contents)?;
        let modified = SystemTime::now() - Duration::from_secs(age_days * 24 * 60 * 60);
        let file = OpenOptions::new().write(true).open(&path)?;
        file.set_modified(modified)?;
        Ok(path)
    }
}
