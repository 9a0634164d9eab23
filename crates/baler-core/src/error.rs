//! # Design
//!
//! - Provide structured, constant-message errors for candidate discovery and
//!   configuration compilation.
//! - Capture operation context (paths, patterns, positions) to make failures
//!   reproducible in tests.
//! - Preserve source errors without interpolating context into messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for collaborator operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced while discovering candidates or compiling configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO failures while reading candidate metadata.
    #[error("candidate io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures.
    #[error("candidate walk failure")]
    Walk {
        /// Operation that triggered the walk failure.
        operation: &'static str,
        /// Path involved in the walk failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// Globset compilation failures.
    #[error("glob pattern failure")]
    Glob {
        /// Operation that triggered the glob failure.
        operation: &'static str,
        /// Glob pattern that failed to compile.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
    /// Archive name pattern parse failures.
    #[error("name pattern invalid")]
    Template {
        /// Static reason for the failure.
        reason: &'static str,
        /// Pattern text that failed to parse.
        pattern: String,
        /// Byte offset where parsing failed.
        position: usize,
    },
}

impl CoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walk(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walk {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn glob(
        operation: &'static str,
        pattern: String,
        source: globset::Error,
    ) -> Self {
        Self::Glob {
            operation,
            pattern,
            source,
        }
    }

    pub(crate) fn template(reason: &'static str, pattern: &str, position: usize) -> Self {
        Self::Template {
            reason,
            pattern: pattern.to_string(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    #[test]
    fn error_helpers_build_variants() -> Result<(), Box<dyn Error>> {
        let io_err = CoreError::io("read", "path", io::Error::other("io"));
        assert!(matches!(io_err, CoreError::Io { .. }));
        assert!(io_err.source().is_some());

        let temp = TempDir::new()?;
        let missing = temp.path().join("missing");
        let walk_error = WalkDir::new(&missing)
            .into_iter()
            .next()
            .and_then(Result::err)
            .ok_or_else(|| io::Error::other("expected walkdir error"))?;
        let walk_err = CoreError::walk("walk", &missing, walk_error);
        assert!(matches!(walk_err, CoreError::Walk { .. }));
        assert!(walk_err.source().is_some());

        let Err(glob_error) = globset::Glob::new("[") else {
            return Err(io::Error::other("expected glob error").into());
        };
        let glob_err = CoreError::glob("compile", "[".to_string(), glob_error);
        assert!(matches!(glob_err, CoreError::Glob { .. }));
        assert!(glob_err.source().is_some());

        let template_err = CoreError::template("dangling_percent", "archive-%", 8);
        assert!(matches!(
            template_err,
            CoreError::Template {
                reason: "dangling_percent",
                position: 8,
                ..
            }
        ));
        Ok(())
    }
}
