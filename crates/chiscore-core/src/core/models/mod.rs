//! # Core Models Module
//!
//! Plain data types describing chi-angle observations and the values derived from them.
//!
//! ## Key Components
//!
//! - [`chi`] - The [`chi::ChiIndex`] enum and its strict parsing from source encodings
//! - [`key`] - [`key::TableKey`], the `(residue type, chi)` pair that names an energy table
//! - [`observation`] - [`observation::AngleObservation`] and the [`observation::Source`] it came from
//! - [`assignment`] - Lookup results ([`assignment::EnergyAssignment`]) and cross-source
//!   comparison rows ([`assignment::ComparisonRecord`])
//! - [`summary`] - Per-key descriptive aggregates of comparison rows
//!
//! Observations are immutable inputs; assignments and records only exist for the
//! duration of one analysis run.

pub mod assignment;
pub mod chi;
pub mod key;
pub mod observation;
pub mod summary;
