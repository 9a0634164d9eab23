//! Archive-then-purge cycle orchestration.

use std::fmt;
use std::path::{Path, PathBuf};

use baler_core::{
    ByModifiedTime, CandidatePath, DeleteVisitor, DeletingVisitor, NamePattern, PathCondition,
    PathSorter, Scanner, SelectHook, SubstitutionContext,
};
use chrono::Utc;
use tracing::{error, info};

use crate::archive::ArchiveBuilder;
use crate::error::{RolloverError, RolloverResult};
use crate::filter::EligibilityFilter;
use crate::slot::{SLOT_PROBE_LIMIT, select_slot};

/// One configured archive-then-purge action over a base directory.
///
/// A cycle scans the base path, orders and filters the candidates, bundles
/// the survivors into one zip at the first free slot, then removes the
/// originals. The archive is complete on disk before the first removal.
pub struct ArchivePurge {
    base_path: PathBuf,
    pattern: NamePattern,
    context: SubstitutionContext,
    sorter: Box<dyn PathSorter>,
    filter: EligibilityFilter,
    select_hook: Option<Box<dyn SelectHook>>,
    follow_links: bool,
    max_depth: usize,
    test_mode: bool,
}

impl ArchivePurge {
    /// Action over `base_path` writing archives named by `pattern`.
    ///
    /// Defaults: scan only the base directory itself, ignore symlinks,
    /// newest-first ordering, no extra conditions, real deletions.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, pattern: NamePattern) -> Self {
        Self {
            base_path: base_path.into(),
            pattern,
            context: SubstitutionContext::new(),
            sorter: Box::new(ByModifiedTime::newest_first()),
            filter: EligibilityFilter::new(),
            select_hook: None,
            follow_links: false,
            max_depth: 1,
            test_mode: false,
        }
    }

    /// Add eligibility conditions evaluated in order behind the suffix gate.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<Box<dyn PathCondition>>) -> Self {
        self.filter = EligibilityFilter::with_conditions(conditions);
        self
    }

    /// Replace the newest-first default ordering.
    #[must_use]
    pub fn with_sorter(mut self, sorter: impl PathSorter + 'static) -> Self {
        self.sorter = Box::new(sorter);
        self
    }

    /// Narrow or reorder the final selection after filtering.
    #[must_use]
    pub fn with_select_hook(mut self, hook: impl SelectHook + 'static) -> Self {
        self.select_hook = Some(Box::new(hook));
        self
    }

    /// Provide `${name}` substitutions for the archive pattern.
    #[must_use]
    pub fn with_substitutions(mut self, context: SubstitutionContext) -> Self {
        self.context = context;
        self
    }

    /// Follow symlinks while scanning.
    #[must_use]
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Scan up to `depth` levels below the base path.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Log removals instead of performing them; archives are still written.
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Base directory this action scans.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Run one cycle with the production deleting visitor.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub fn run(&self) -> RolloverResult<bool> {
        let visitor = if self.test_mode {
            DeletingVisitor::test_mode()
        } else {
            DeletingVisitor::new()
        };
        self.run_with(&visitor)
    }

    /// Run one cycle, delivering each archived file to `visitor`.
    ///
    /// Completion is reported as `Ok(true)` even when individual removals
    /// fail; those are logged, handed to
    /// [`visit_failed`](DeleteVisitor::visit_failed) and skipped.
    ///
    /// # Errors
    ///
    /// Scan and archive failures abort the cycle before any removal.
    pub fn run_with(&self, visitor: &dyn DeleteVisitor) -> RolloverResult<bool> {
        let candidates = self.select_candidates()?;
        if candidates.is_empty() {
            info!(base = %self.base_path.display(), "no eligible files, skipping archive");
            return Ok(true);
        }

        let now = Utc::now();
        let target = select_slot(&self.pattern, now, &self.context, SLOT_PROBE_LIMIT);
        let mut builder = ArchiveBuilder::new(&target);
        for candidate in &candidates {
            builder.add_entry(&candidate.path)?;
        }
        builder.build()?;

        let mut purged = 0_usize;
        let mut failed = 0_usize;
        for candidate in &candidates {
            match visitor.visit(&candidate.path, &candidate.attributes) {
                Ok(()) => purged += 1,
                Err(err) => {
                    failed += 1;
                    error!(
                        error = %err,
                        path = %candidate.path.display(),
                        "failed to purge archived file"
                    );
                    visitor.visit_failed(&candidate.path, &err);
                }
            }
        }

        info!(
            base = %self.base_path.display(),
            archive = %target.display(),
            archived = candidates.len(),
            purged,
            failed,
            "rollover archive cycle complete"
        );
        Ok(true)
    }

    /// Scan, order, and filter the base path, producing the selection a
    /// cycle would archive without touching anything.
    ///
    /// # Errors
    ///
    /// Returns an error when the walk or an attribute read fails; no
    /// partial selection is produced.
    pub fn select_candidates(&self) -> RolloverResult<Vec<CandidatePath>> {
        let scanner = Scanner::new()
            .follow_links(self.follow_links)
            .max_depth(self.max_depth);
        let mut candidates = scanner
            .scan(&self.base_path)
            .map_err(|source| RolloverError::scan(&self.base_path, source))?;

        self.sorter.sort(&mut candidates);
        self.filter.before_scan();
        candidates.retain(|candidate| self.filter.accept(&self.base_path, candidate));
        if let Some(hook) = &self.select_hook {
            candidates = hook.select(&self.base_path, candidates);
        }
        Ok(candidates)
    }
}

impl fmt::Debug for ArchivePurge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchivePurge")
            .field("base_path", &self.base_path)
            .field("pattern", &self.pattern)
            .field("context", &self.context)
            .field("follow_links", &self.follow_links)
            .field("max_depth", &self.max_depth)
            .field("test_mode", &self.test_mode)
            .finish_non_exhaustive()
    }
}
