//! # Energy Lookup Module
//!
//! Maps chi angles to knowledge-based energies using piecewise-constant tables.
//!
//! ## Key Components
//!
//! - [`angle`] - Wrapping of raw dihedral values into `[0, 360)`
//! - [`table`] - [`table::EnergyBin`] rows, per-key [`table::EnergyTable`]s and the
//!   [`table::EnergyTableSet`] used by a run
//! - [`lookup`] - The angle-to-energy lookup with its boundary and fallback policies
//!
//! ## Usage
//!
//! ```ignore
//! use chiscore::core::energy::lookup::{lookup, BoundaryPolicy, FallbackPolicy};
//!
//! let energy = lookup(Some(30.0), table.bins(), BoundaryPolicy::ClosedUpper, FallbackPolicy::default())?;
//! ```

pub mod angle;
pub mod lookup;
pub mod table;
