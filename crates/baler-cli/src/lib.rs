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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line front end for archive-then-purge rollover cycles.
//!
//! Layout:
//! - `cli.rs`: argument parsing, dispatch, and plan rendering
//! - `config.rs`: TOML settings mapped onto a configured action
//! - `logging.rs`: tracing subscriber installation
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod logging;

pub use cli::run;
