//! Eligibility filtering for scanned candidates.

use std::path::Path;

use baler_core::{CandidatePath, PathCondition};

/// File name suffix every archive candidate must carry.
pub const LOG_FILE_SUFFIX: &str = ".log";

/// Fixed suffix gate followed by an ordered all-must-pass condition chain.
///
/// The suffix gate always runs first and cannot be configured away.
/// Conditions run in insertion order against the path relative to the base
/// directory and short-circuit on the first rejection. Names that are not
/// valid UTF-8 never qualify.
pub struct EligibilityFilter {
    conditions: Vec<Box<dyn PathCondition>>,
}

impl EligibilityFilter {
    /// Filter with the suffix gate only.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Filter with the suffix gate plus `conditions`.
    #[must_use]
    pub const fn with_conditions(conditions: Vec<Box<dyn PathCondition>>) -> Self {
        Self { conditions }
    }

    /// Reset stateful conditions ahead of a cycle.
    pub fn before_scan(&self) {
        for condition in &self.conditions {
            condition.before_scan();
        }
    }

    /// Decide whether `candidate` under `base` stays selected.
    #[must_use]
    pub fn accept(&self, base: &Path, candidate: &CandidatePath) -> bool {
        if !candidate
            .file_name()
            .is_some_and(|name| name.ends_with(LOG_FILE_SUFFIX))
        {
            return false;
        }
        let relative = candidate.relative_to(base);
        self.conditions
            .iter()
            .all(|condition| condition.accept(base, relative, &candidate.attributes))
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baler_core::{FileAttributes, FileKind, NameMatches};
    use chrono::Utc;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidate(path: &str) -> CandidatePath {
        CandidatePath::new(
            PathBuf::from(path),
            FileAttributes {
                size: 16,
                modified: Utc::now(),
                kind: FileKind::File,
            },
        )
    }

    #[test]
    fn suffix_gate_always_applies() {
        let filter = EligibilityFilter::new();
        let base = Path::new("/logs");
        assert!(filter.accept(base, &candidate("/logs/app.log")));
        assert!(!filter.accept(base, &candidate("/logs/app.txt")));
        assert!(!filter.accept(base, &candidate("/logs/app.log.gz")));
    }

    #[test]
    fn conditions_see_paths_relative_to_the_base() -> anyhow::Result<()> {
        let matches = NameMatches::new(["nested/*.log"])?;
        let filter = EligibilityFilter::with_conditions(vec![Box::new(matches)]);
        let base = Path::new("/logs");
        assert!(filter.accept(base, &candidate("/logs/nested/app.log")));
        assert!(!filter.accept(base, &candidate("/logs/app.log")));
        Ok(())
    }

    #[test]
    fn chain_short_circuits_on_the_first_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let never = |_: &Path, _: &Path, _: &FileAttributes| false;
        let count = move |_: &Path, _: &Path, _: &FileAttributes| {
            counter.fetch_add(1, Ordering::Relaxed);
            true
        };

        let filter = EligibilityFilter::with_conditions(vec![Box::new(never), Box::new(count)]);
        assert!(!filter.accept(Path::new("/logs"), &candidate("/logs/app.log")));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
