//! Archive slot probing.

use std::path::PathBuf;

use baler_core::{NamePattern, SubstitutionContext};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Number of slot indices probed before the first slot gets reused.
pub const SLOT_PROBE_LIMIT: u32 = 10;

/// Find the first free archive path for `pattern`.
///
/// Indices `0..limit` render in order and the first path that does not
/// exist yet wins. With every slot taken, the first slot is reused and the
/// archive already there will be overwritten.
#[must_use]
pub fn select_slot(
    pattern: &NamePattern,
    now: DateTime<Utc>,
    context: &SubstitutionContext,
    limit: u32,
) -> PathBuf {
    for index in 0..limit {
        let candidate = PathBuf::from(pattern.render(index, now, context));
        if !candidate.exists() {
            return candidate;
        }
    }

    let fallback = PathBuf::from(pattern.render(0, now, context));
    warn!(
        pattern = pattern.as_str(),
        path = %fallback.display(),
        "no free archive slot, reusing the first one"
    );
    fallback
}
