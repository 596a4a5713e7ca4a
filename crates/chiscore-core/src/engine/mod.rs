//! # Engine Module
//!
//! Energy assignment and cross-source comparison over in-memory observations.
//!
//! ## Overview
//!
//! The engine turns chi-angle observations into energies using the per-residue tables from
//! [`crate::core::energy`], then pairs the residues two extraction pipelines have in common
//! and reports how their energies and angles differ. Everything here works on collections
//! already in memory; reading and writing files is left to [`crate::core::io`] and the
//! [`crate::workflows`] that drive it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Lookup policy, join granularity, delta sign and the
//!   builders that validate them
//! - **Assignment** ([`assignment`]) - Partitioning by `(residue type, chi)` and parallel lookup
//! - **Comparison** ([`comparator`]) - The inner join, signed deltas and run statistics
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - [`error::EngineError`], wrapping every lower-level failure
//!
//! Neither assignment nor comparison logs or touches the filesystem.

pub mod assignment;
pub mod comparator;
pub mod config;
pub mod error;
pub mod progress;
