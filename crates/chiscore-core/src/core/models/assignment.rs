use super::chi::ChiIndex;
use super::key::TableKey;
use super::observation::AngleObservation;

/// An observation together with the energy looked up for its angle.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyAssignment {
    pub observation: AngleObservation,
    /// Energy in kcal/mol; `None` when the angle was missing.
    pub energy: Option<f64>,
}

impl EnergyAssignment {
    pub fn key(&self) -> TableKey {
        self.observation.table_key()
    }
}

/// A residue chi angle observed in both sources, with signed differences between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub chain: String,
    pub residue_id: String,
    pub residue_type: String,
    pub chi: ChiIndex,
    pub baseline_alt_location: String,
    pub alternative_alt_location: String,
    pub baseline_angle: Option<f64>,
    pub alternative_angle: Option<f64>,
    pub baseline_energy: Option<f64>,
    pub alternative_energy: Option<f64>,
    pub angle_delta: Option<f64>,
    pub energy_delta: Option<f64>,
}

impl ComparisonRecord {
    pub fn key(&self) -> TableKey {
        TableKey::new(&self.residue_type, self.chi)
    }
}
