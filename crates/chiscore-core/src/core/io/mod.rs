//! Provides input/output for the files surrounding an analysis run.
//!
//! Energy tables and rotamer extraction outputs are read from CSV into in-memory
//! collections, and results are written back out as plot-ready CSV. Nothing in
//! [`crate::core::energy`] or [`crate::engine::comparator`] touches the filesystem;
//! these readers and writers run before and after them.

pub mod export;
pub mod observations;
pub mod tables;
