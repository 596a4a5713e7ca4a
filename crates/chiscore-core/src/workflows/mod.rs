//! # Workflows Module
//!
//! End-to-end procedures built on the engine: load energy tables and rotamer extraction
//! files from disk, run the engine over them, and hand back results together with the
//! bookkeeping a front end needs for reporting.
//!
//! - **Comparison** ([`compare`]) - Scores two sources and joins the residues they share.
//! - **Assignment** ([`assign`]) - Scores a single source.
//!
//! Input files are parsed in parallel. A file that cannot be parsed is skipped and listed in
//! the result instead of aborting the run; missing directories and malformed energy tables
//! are errors.

pub mod assign;
pub mod compare;
pub mod loading;
