//! # Core Module
//!
//! The stateless foundation of chiscore: the data model for chi-angle observations,
//! the knowledge-based energy lookup, and the file readers and writers that feed them.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Chi indices, table keys, observations, assignments
//!   and comparison records
//! - **Energy Lookup** ([`energy`]) - Angle normalization, energy tables and the
//!   angle-to-energy lookup with its boundary and fallback policies
//! - **File I/O** ([`io`]) - Loading energy tables and rotamer extraction outputs,
//!   exporting results
//!
//! ## Scientific Foundation
//!
//! Knowledge-based energies are empirical scores derived from how often a dihedral value
//! is observed across known structures. They are tabulated as piecewise-constant functions
//! of the angle, one table per residue type and chi angle, and used here as a scoring proxy
//! rather than a physical force-field term.

pub mod energy;
pub mod io;
pub mod models;
