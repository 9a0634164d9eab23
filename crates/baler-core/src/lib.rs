//! Collaborators for log-rollover post-processing: candidate discovery,
//! eligibility conditions, ordering, archive name templating and deletion
//! callbacks.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

pub mod condition;
pub mod error;
pub mod model;
pub mod scan;
pub mod sort;
pub mod template;
pub mod visitor;

pub use condition::{
    AllOf, AnyOf, BeyondCount, BeyondTotalSize, NameMatches, Not, OlderThan, PathCondition,
    SelectHook,
};
pub use error::{CoreError, CoreResult};
pub use model::{CandidatePath, FileAttributes, FileKind};
pub use scan::Scanner;
pub use sort::{ByModifiedTime, PathSorter};
pub use template::{NamePattern, SubstitutionContext};
pub use visitor::{DeleteVisitor, DeletingVisitor};
