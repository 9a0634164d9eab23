//! Candidate ordering strategies.

use crate::model::CandidatePath;

/// Ordering applied to the scanned candidates before the filter runs.
///
/// Order matters to counting conditions, so sorting happens exactly once
/// per cycle, ahead of the condition chain.
pub trait PathSorter: Send + Sync {
    /// Reorder `candidates` in place.
    fn sort(&self, candidates: &mut [CandidatePath]);
}

impl<F> PathSorter for F
where
    F: Fn(&mut [CandidatePath]) + Send + Sync,
{
    fn sort(&self, candidates: &mut [CandidatePath]) {
        self(candidates);
    }
}

/// Orders candidates by their last modification time.
///
/// The sort is stable, so same-timestamp entries keep their scan order.
#[derive(Clone, Copy, Debug)]
pub struct ByModifiedTime {
    newest_first: bool,
}

impl ByModifiedTime {
    /// Most recently modified entries first.
    #[must_use]
    pub const fn newest_first() -> Self {
        Self { newest_first: true }
    }

    /// Least recently modified entries first.
    #[must_use]
    pub const fn oldest_first() -> Self {
        Self { newest_first: false }
    }
}

impl Default for ByModifiedTime {
    fn default() -> Self {
        Self::newest_first()
    }
}

impl PathSorter for ByModifiedTime {
    fn sort(&self, candidates: &mut [CandidatePath]) {
        if self.newest_first {
            candidates.sort_by(|a, b| b.attributes.modified.cmp(&a.attributes.modified));
        } else {
            candidates.sort_by(|a, b| a.attributes.modified.cmp(&b.attributes.modified));
        }
    }
}
