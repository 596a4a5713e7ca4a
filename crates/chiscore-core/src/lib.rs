//! # chiscore Core Library
//!
//! Scores side-chain chi dihedral angles against empirical per-residue energy tables and
//! compares the scores of two rotamer extraction pipelines, typically single-conformer
//! models against multi-conformer (qFit) models of the same structures.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so each layer can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AngleObservation`, `TableKey`),
//!   the piecewise-constant energy lookup, and CSV readers and writers.
//!
//! - **[`engine`]: The Logic Core.** Validated configuration, parallel energy assignment
//!   partitioned by residue type and chi, and the cross-source comparator that joins both
//!   datasets and computes signed deltas.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that load tables and
//!   observations from disk, run the engine, and report progress along the way.

pub mod core;
pub mod engine;
pub mod workflows;
