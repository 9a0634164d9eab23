//! Deflate zip assembly for archived log files.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{RolloverError, RolloverResult};

/// Collects regular files and writes them into a single deflate zip.
///
/// Entries are stored flat under their base file names. Queuing two paths
/// that share a base name yields one archive entry, kept at the position of
/// the first addition with the contents of the last.
pub struct ArchiveBuilder {
    target: PathBuf,
    entries: Vec<PathBuf>,
}

impl ArchiveBuilder {
    /// Builder writing to `target`.
    #[must_use]
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            entries: Vec::new(),
        }
    }

    /// Archive path this builder writes to.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Number of queued source paths.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `path` for archiving.
    ///
    /// # Errors
    ///
    /// Fails fast when `path` is not an existing regular file at call time,
    /// or when its metadata cannot be read; nothing is queued in that case.
    pub fn add_entry(&mut self, path: &Path) -> RolloverResult<()> {
        let metadata = fs::metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                RolloverError::entry_not_file(path)
            } else {
                RolloverError::archive("add_entry.metadata", path, source)
            }
        })?;
        if !metadata.is_file() {
            return Err(RolloverError::entry_not_file(path));
        }
        self.entries.push(path.to_path_buf());
        Ok(())
    }

    /// Write the archive.
    ///
    /// With nothing queued this is a no-op and no target file is created.
    /// Parent directories of the target are created as needed and source
    /// contents are streamed in, never buffered whole.
    ///
    /// # Errors
    ///
    /// Returns an error when the target cannot be written or a source
    /// cannot be read; a partially written target may remain behind.
    pub fn build(self) -> RolloverResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|source| RolloverError::archive("build.create_parent", parent, source))?;
        }

        let mut plan: Vec<(String, PathBuf)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for path in self.entries {
            let name = entry_name(&path);
            if let Some(&position) = positions.get(&name) {
                plan[position].1 = path;
            } else {
                positions.insert(name.clone(), plan.len());
                plan.push((name, path));
            }
        }

        let file = File::create(&self.target)
            .map_err(|source| RolloverError::archive("build.create", &self.target, source))?;
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(true);

        let entries = plan.len();
        for (name, path) in plan {
            writer
                .start_file(name, options)
                .map_err(|source| RolloverError::zip("build.start_entry", &self.target, source))?;
            let mut source_file = File::open(&path)
                .map_err(|source| RolloverError::archive("build.open_entry", &path, source))?;
            io::copy(&mut source_file, &mut writer)
                .map_err(|source| RolloverError::archive("build.copy_entry", &path, source))?;
        }
        writer
            .finish()
            .map_err(|source| RolloverError::zip("build.finish", &self.target, source))?;

        info!(path = %self.target.display(), entries, "archive written");
        Ok(())
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
