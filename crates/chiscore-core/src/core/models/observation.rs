use super::chi::ChiIndex;
use super::key::TableKey;
use crate::core::energy::angle::normalize_angle;
use std::fmt;

/// The extraction pipeline that produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Single-conformer rotamer extraction.
    Baseline,
    /// Multi-conformer (qFit) rotamer extraction.
    Alternative,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Baseline => "baseline",
            Source::Alternative => "alternative",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One measured chi dihedral of one residue conformer.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleObservation {
    pub chain: String,
    pub residue_id: String,
    /// Alternate conformer tag; empty for the primary conformer.
    pub alt_location: String,
    pub residue_type: String,
    pub chi: ChiIndex,
    /// Angle in degrees. `None` when the source value was absent or unparsable.
    pub angle: Option<f64>,
    pub source: Source,
}

impl AngleObservation {
    pub fn new(
        chain: &str,
        residue_id: &str,
        residue_type: &str,
        chi: ChiIndex,
        angle: Option<f64>,
        source: Source,
    ) -> Self {
        Self {
            chain: chain.trim().to_string(),
            residue_id: residue_id.trim().to_string(),
            alt_location: String::new(),
            residue_type: residue_type.trim().to_ascii_uppercase(),
            chi,
            angle,
            source,
        }
    }

    pub fn with_alt_location(mut self, alt_location: &str) -> Self {
        self.alt_location = alt_location.trim().to_string();
        self
    }

    pub fn has_alt_location(&self) -> bool {
        !self.alt_location.is_empty()
    }

    pub fn table_key(&self) -> TableKey {
        TableKey::new(&self.residue_type, self.chi)
    }

    /// Returns a copy with the angle wrapped into `[0, 360)`.
    pub fn normalized(&self) -> Self {
        Self {
            angle: self.angle.and_then(normalize_angle),
            ..self.clone()
        }
    }
}
