//! Archive-and-purge rollover action: bundle eligible log files into one
//! deflate zip at the first free slot, then remove the originals.
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

pub mod action;
pub mod archive;
pub mod error;
pub mod filter;
pub mod slot;

pub use action::ArchivePurge;
pub use archive::ArchiveBuilder;
pub use error::{RolloverError, RolloverResult};
pub use filter::{EligibilityFilter, LOG_FILE_SUFFIX};
pub use slot::{SLOT_PROBE_LIMIT, select_slot};
