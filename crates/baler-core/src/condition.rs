//! Eligibility conditions applied to discovered candidates.
//!
//! Conditions form an ordered all-must-pass chain. Stateful conditions keep
//! their per-cycle accumulators behind atomics so the chain stays shareable
//! across threads scanning independent base paths.

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::{Duration, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{CoreError, CoreResult};
use crate::model::{CandidatePath, FileAttributes};

/// Per-candidate predicate applied by the eligibility filter.
///
/// Implementations must be side-effect free with respect to the filesystem;
/// the only state they may carry is their own per-cycle accumulators.
pub trait PathCondition: Send + Sync {
    /// Decide whether the entry at `relative` (under `base`) stays selected.
    fn accept(&self, base: &Path, relative: &Path, attributes: &FileAttributes) -> bool;

    /// Hook invoked once per cycle before the first `accept` call so
    /// stateful conditions can reset their accumulators.
    fn before_scan(&self) {}
}

impl<F> PathCondition for F
where
    F: Fn(&Path, &Path, &FileAttributes) -> bool + Send + Sync,
{
    fn accept(&self, base: &Path, relative: &Path, attributes: &FileAttributes) -> bool {
        self(base, relative, attributes)
    }
}

/// Final list-level refinement applied after the per-candidate filter.
///
/// A hook may reorder or drop entries but must not introduce paths that were
/// not part of the selection handed to it.
pub trait SelectHook: Send + Sync {
    /// Refine the filtered selection for this cycle.
    fn select(&self, base: &Path, selected: Vec<CandidatePath>) -> Vec<CandidatePath>;
}

impl<F> SelectHook for F
where
    F: Fn(&Path, Vec<CandidatePath>) -> Vec<CandidatePath> + Send + Sync,
{
    fn select(&self, base: &Path, selected: Vec<CandidatePath>) -> Vec<CandidatePath> {
        self(base, selected)
    }
}

/// Accepts entries whose relative path matches any of the configured globs.
#[derive(Clone, Debug)]
pub struct NameMatches {
    globs: GlobSet,
}

impl NameMatches {
    /// Compile the given glob patterns.
    ///
    /// # Errors
    ///
    /// Returns an error when a pattern fails to compile.
    pub fn new<I, S>(patterns: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(
                Glob::new(pattern).map_err(|source| {
                    CoreError::glob("name_matches.compile", pattern.to_string(), source)
                })?,
            );
        }
        let globs = builder
            .build()
            .map_err(|source| CoreError::glob("name_matches.build", "<set>".to_string(), source))?;
        Ok(Self { globs })
    }
}

impl PathCondition for NameMatches {
    fn accept(&self, _base: &Path, relative: &Path, _attributes: &FileAttributes) -> bool {
        self.globs.is_match(relative)
    }
}

/// Accepts entries whose last modification lies at least the configured age
/// in the past.
#[derive(Clone, Copy, Debug)]
pub struct OlderThan {
    min_age: Duration,
}

impl OlderThan {
    /// Accept entries at least `min_age` old.
    #[must_use]
    pub const fn new(min_age: Duration) -> Self {
        Self { min_age }
    }

    /// Accept entries at least `days` days old.
    #[must_use]
    pub const fn days(days: i64) -> Self {
        Self::new(Duration::days(days))
    }
}

impl PathCondition for OlderThan {
    fn accept(&self, _base: &Path, _relative: &Path, attributes: &FileAttributes) -> bool {
        Utc::now() - attributes.modified >= self.min_age
    }
}

/// Accepts every entry after the first `keep` seen in a cycle.
///
/// Pairs with a newest-first ordering to express "keep the newest N files".
#[derive(Debug)]
pub struct BeyondCount {
    keep: usize,
    seen: AtomicUsize,
}

impl BeyondCount {
    /// Keep the first `keep` entries of each cycle out of the selection.
    #[must_use]
    pub const fn new(keep: usize) -> Self {
        Self {
            keep,
            seen: AtomicUsize::new(0),
        }
    }
}

impl PathCondition for BeyondCount {
    fn accept(&self, _base: &Path, _relative: &Path, _attributes: &FileAttributes) -> bool {
        self.seen.fetch_add(1, Ordering::Relaxed) >= self.keep
    }

    fn before_scan(&self) {
        self.seen.store(0, Ordering::Relaxed);
    }
}

/// Accepts entries once the running size total of a cycle exceeds a byte
/// threshold, the current entry included.
#[derive(Debug)]
pub struct BeyondTotalSize {
    threshold: u64,
    accumulated: AtomicU64,
}

impl BeyondTotalSize {
    /// Accept entries once more than `threshold` bytes have been seen.
    #[must_use]
    pub const fn new(threshold: u64) -> Self {
        Self {
            threshold,
            accumulated: AtomicU64::new(0),
        }
    }
}

impl PathCondition for BeyondTotalSize {
    fn accept(&self, _base: &Path, _relative: &Path, attributes: &FileAttributes) -> bool {
        let total = self
            .accumulated
            .fetch_add(attributes.size, Ordering::Relaxed)
            + attributes.size;
        total > self.threshold
    }

    fn before_scan(&self) {
        self.accumulated.store(0, Ordering::Relaxed);
    }
}

/// Accepts only when every inner condition accepts, in order.
pub struct AllOf {
    conditions: Vec<Box<dyn PathCondition>>,
}

impl AllOf {
    /// Combine `conditions` conjunctively.
    #[must_use]
    pub const fn new(conditions: Vec<Box<dyn PathCondition>>) -> Self {
        Self { conditions }
    }
}

impl PathCondition for AllOf {
    fn accept(&self, base: &Path, relative: &Path, attributes: &FileAttributes) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.accept(base, relative, attributes))
    }

    fn before_scan(&self) {
        for condition in &self.conditions {
            condition.before_scan();
        }
    }
}

/// Accepts when at least one inner condition accepts, in order.
pub struct AnyOf {
    conditions: Vec<Box<dyn PathCondition>>,
}

impl AnyOf {
    /// Combine `conditions` disjunctively.
    #[must_use]
    pub const fn new(conditions: Vec<Box<dyn PathCondition>>) -> Self {
        Self { conditions }
    }
}

impl PathCondition for AnyOf {
    fn accept(&self, base: &Path, relative: &Path, attributes: &FileAttributes) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.accept(base, relative, attributes))
    }

    fn before_scan(&self) {
        for condition in &self.conditions {
            condition.before_scan();
        }
    }
}

/// Inverts an inner condition.
pub struct Not {
    inner: Box<dyn PathCondition>,
}

impl Not {
    /// Negate `inner`.
    #[must_use]
    pub fn new(inner: impl PathCondition + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl PathCondition for Not {
    fn accept(&self, base: &Path, relative: &Path, attributes: &FileAttributes) -> bool {
        !self.inner.accept(base, relative, attributes)
    }

    fn before_scan(&self) {
        self.inner.before_scan();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;
    use anyhow::Result;

    fn attributes(size: u64, age_days: i64) -> FileAttributes {
        FileAttributes {
            size,
            modified: Utc::now() - Duration::days(age_days),
            kind: FileKind::File,
        }
    }

    #[test]
    fn closures_implement_conditions() {
        let condition = |_base: &Path, relative: &Path, _attributes: &FileAttributes| {
            relative.to_string_lossy().contains("app")
        };
        let attrs = attributes(1, 0);
        assert!(condition.accept(Path::new("/logs"), Path::new("app.log"), &attrs));
        assert!(!condition.accept(Path::new("/logs"), Path::new("server.log"), &attrs));
        condition.before_scan();
    }

    #[test]
    fn name_matches_uses_relative_paths() -> Result<()> {
        let condition = NameMatches::new(["server-*.log", "nested/**/*.log"])?;
        let attrs = attributes(1, 0);
        let base = Path::new("/logs");
        assert!(condition.accept(base, Path::new("server-3.log"), &attrs));
        assert!(condition.accept(base, Path::new("nested/deep/app.log"), &attrs));
        assert!(!condition.accept(base, Path::new("app.log"), &attrs));
        Ok(())
    }

    #[test]
    fn name_matches_rejects_invalid_globs() {
        let err = NameMatches::new(["["]).expect_err("invalid glob should fail");
        assert!(matches!(err, CoreError::Glob { .. }));
    }

    #[test]
    fn older_than_compares_against_now() {
        let condition = OlderThan::days(7);
        let base = Path::new("/logs");
        let relative = Path::new("app.log");
        assert!(condition.accept(base, relative, &attributes(1, 10)));
        assert!(!condition.accept(base, relative, &attributes(1, 2)));
    }

    #[test]
    fn beyond_count_resets_between_cycles() {
        let condition = BeyondCount::new(2);
        let attrs = attributes(1, 0);
        let base = Path::new("/logs");
        let relative = Path::new("app.log");

        assert!(!condition.accept(base, relative, &attrs));
        assert!(!condition.accept(base, relative, &attrs));
        assert!(condition.accept(base, relative, &attrs));

        condition.before_scan();
        assert!(!condition.accept(base, relative, &attrs));
    }

    #[test]
    fn beyond_total_size_accumulates_current_entry() {
        let condition = BeyondTotalSize::new(100);
        let base = Path::new("/logs");
        let relative = Path::new("app.log");

        assert!(!condition.accept(base, relative, &attributes(60, 0)));
        assert!(condition.accept(base, relative, &attributes(60, 0)));

        condition.before_scan();
        assert!(!condition.accept(base, relative, &attributes(100, 0)));
        assert!(condition.accept(base, relative, &attributes(1, 0)));
    }

    #[test]
    fn combinators_forward_reset_and_logic() {
        let all = AllOf::new(vec![
            Box::new(BeyondCount::new(0)),
            Box::new(OlderThan::days(0)),
        ]);
        let attrs = attributes(1, 1);
        let base = Path::new("/logs");
        let relative = Path::new("app.log");
        assert!(all.accept(base, relative, &attrs));

        let any = AnyOf::new(vec![
            Box::new(OlderThan::days(30)),
            Box::new(BeyondCount::new(0)),
        ]);
        assert!(any.accept(base, relative, &attrs));

        let not = Not::new(OlderThan::days(30));
        assert!(not.accept(base, relative, &attrs));
        not.before_scan();
    }
}
