//! # Design
//!
//! - Constant top-level messages; dynamic detail lives in structured fields.
//! - `operation` pins the failing step with a dotted name.
//! - Discovery failures wrap the collaborator error so callers handle one
//!   type per cycle.

use std::io;
use std::path::PathBuf;

use baler_core::CoreError;
use thiserror::Error;

/// Result type for rollover operations.
pub type RolloverResult<T> = Result<T, RolloverError>;

/// Errors produced while archiving and purging log files.
#[derive(Debug, Error)]
pub enum RolloverError {
    /// Candidate discovery failed before anything was archived.
    #[error("rollover scan failure")]
    Scan {
        /// Base path whose scan failed.
        path: PathBuf,
        /// Underlying discovery error.
        source: CoreError,
    },
    /// An entry offered to the archive builder is missing or not a regular
    /// file.
    #[error("rollover entry is not an existing regular file")]
    EntryNotFile {
        /// Offending path.
        path: PathBuf,
    },
    /// IO failures while creating the archive or reading a source file.
    #[error("rollover archive io failure")]
    Archive {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Zip encoder failures while writing the archive.
    #[error("rollover archive zip failure")]
    Zip {
        /// Operation that triggered the zip failure.
        operation: &'static str,
        /// Archive path being written.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },
}

impl RolloverError {
    pub(crate) fn scan(path: impl Into<PathBuf>, source: CoreError) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn entry_not_file(path: impl Into<PathBuf>) -> Self {
        Self::EntryNotFile { path: path.into() }
    }

    pub(crate) fn archive(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Archive {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: zip::result::ZipError,
    ) -> Self {
        Self::Zip {
            operation,
            path: path.into(),
            source,
        }
    }
}
