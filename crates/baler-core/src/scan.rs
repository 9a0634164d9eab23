//! Filesystem discovery of archive candidates.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};
use crate::model::{CandidatePath, FileAttributes};

/// Walks a base directory and captures regular files with their attributes.
///
/// Directories are never candidates themselves. Symlinks only qualify when
/// link following is enabled, in which case the target's attributes are
/// captured.
#[derive(Clone, Copy, Debug)]
pub struct Scanner {
    follow_links: bool,
    max_depth: Option<usize>,
}

impl Scanner {
    /// Scanner that ignores symlinks and walks without a depth limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
        }
    }

    /// Follow symlinks while walking.
    #[must_use]
    pub const fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Stop descending below `depth` levels under the base directory.
    ///
    /// Depth `1` restricts the scan to the base directory's direct entries.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Collect every regular file under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the walk fails or file attributes cannot be
    /// read; no partial candidate list is produced in that case.
    pub fn scan(&self, base: &Path) -> CoreResult<Vec<CandidatePath>> {
        let mut walker = WalkDir::new(base)
            .min_depth(1)
            .follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| CoreError::walk("scan.walk", base, source))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = entry
                .metadata()
                .map_err(|source| CoreError::walk("scan.metadata", entry.path(), source))?;
            let attributes = FileAttributes::from_metadata(&metadata)
                .map_err(|source| CoreError::io("scan.attributes", entry.path(), source))?;
            candidates.push(CandidatePath::new(entry.into_path(), attributes));
        }
        Ok(candidates)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
