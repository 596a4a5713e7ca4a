use super::lookup::{self, BoundaryPolicy, FallbackPolicy, LookupError};
use crate::core::models::key::TableKey;
use serde::Deserialize;
use std::collections::HashMap;

/// One row of a piecewise-constant energy table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EnergyBin {
    #[serde(rename = "bin min")]
    pub bin_min: f64,
    #[serde(rename = "bin max")]
    pub bin_max: f64,
    /// Energy in kcal/mol.
    #[serde(rename = "E")]
    pub energy: f64,
}

/// The energy bins for one residue type and chi angle, in file row order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    pub key: TableKey,
    bins: Vec<EnergyBin>,
}

impl EnergyTable {
    pub fn new(key: TableKey, bins: Vec<EnergyBin>) -> Self {
        Self { key, bins }
    }

    pub fn bins(&self) -> &[EnergyBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn max_energy(&self) -> Option<f64> {
        lookup::max_energy(&self.bins)
    }

    pub fn lookup(
        &self,
        angle: Option<f64>,
        policy: BoundaryPolicy,
        fallback: FallbackPolicy,
    ) -> Result<Option<f64>, LookupError> {
        lookup::lookup(angle, &self.bins, policy, fallback)
    }
}

/// All energy tables available to a run, keyed by `(residue type, chi)`.
#[derive(Debug, Clone, Default)]
pub struct EnergyTableSet {
    tables: HashMap<TableKey, EnergyTable>,
}

impl EnergyTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, returning the one it replaced if the key was already present.
    pub fn insert(&mut self, table: EnergyTable) -> Option<EnergyTable> {
        self.tables.insert(table.key.clone(), table)
    }

    pub fn get(&self, key: &TableKey) -> Option<&EnergyTable> {
        self.tables.get(key)
    }

    /// Looks a table up by its canonical name, e.g. `SER_CHI1`.
    pub fn get_by_name(&self, name: &str) -> Option<&EnergyTable> {
        let key = name.parse::<TableKey>().ok()?;
        self.tables.get(&key)
    }

    pub fn contains(&self, key: &TableKey) -> bool {
        self.tables.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&TableKey> {
        let mut keys: Vec<_> = self.tables.keys().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<EnergyTable> for EnergyTableSet {
    fn from_iter<I: IntoIterator<Item = EnergyTable>>(iter: I) -> Self {
        let mut set = Self::new();
        for table in iter {
            set.insert(table);
        }
        set
    }
}
