//! Domain models for rollover post-processing.
//!
//! # Design
//! - Capture file attributes once at discovery; the pipeline reads them
//!   immutably for the rest of the cycle.
//! - Keep candidate types serializable so selection previews can be emitted
//!   as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of filesystem entry a candidate refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

/// Attributes captured for a candidate at discovery time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    /// Size of the entry in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Kind of entry.
    pub kind: FileKind,
}

impl FileAttributes {
    /// Capture attributes from filesystem metadata.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot report a modification time.
    pub fn from_metadata(metadata: &fs::Metadata) -> io::Result<Self> {
        let file_type = metadata.file_type();
        let kind = if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_symlink() {
            FileKind::Symlink
        } else {
            FileKind::File
        };
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified()?.into(),
            kind,
        })
    }
}

/// A filesystem entry discovered under the base directory for one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePath {
    /// Path of the entry as discovered.
    pub path: PathBuf,
    /// Attributes captured at discovery time.
    pub attributes: FileAttributes,
}

impl CandidatePath {
    /// Build a candidate from a path and captured attributes.
    #[must_use]
    pub const fn new(path: PathBuf, attributes: FileAttributes) -> Self {
        Self { path, attributes }
    }

    /// Final path segment, when the name is valid UTF-8.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// Path relative to `base`, falling back to the full path when `base`
    /// is not a prefix.
    #[must_use]
    pub fn relative_to(&self, base: &Path) -> &Path {
        self.path.strip_prefix(base).unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn attributes_capture_size_and_kind() -> Result<()> {
        let temp = TempDir::new()?;
        let file_path = temp.path().join("app.log");
        fs::write(&file_path, b"payload")?;

        let attributes = FileAttributes::from_metadata(&fs::metadata(&file_path)?)?;
        assert_eq!(attributes.size, 7);
        assert_eq!(attributes.kind, FileKind::File);

        let dir_attributes = FileAttributes::from_metadata(&fs::metadata(temp.path())?)?;
        assert_eq!(dir_attributes.kind, FileKind::Directory);
        Ok(())
    }

    #[test]
    fn relative_to_strips_base_prefix() -> Result<()> {
        let temp = TempDir::new()?;
        let file_path = temp.path().join("nested").join("app.log");
        fs::create_dir_all(file_path.parent().expect("parent"))?;
        fs::write(&file_path, b"x")?;

        let candidate = CandidatePath::new(
            file_path.clone(),
            FileAttributes::from_metadata(&fs::metadata(&file_path)?)?,
        );
        assert_eq!(
            candidate.relative_to(temp.path()),
            Path::new("nested/app.log")
        );
        assert_eq!(candidate.relative_to(Path::new("/unrelated")), file_path);
        assert_eq!(candidate.file_name(), Some("app.log"));
        Ok(())
    }
}
