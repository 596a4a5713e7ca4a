use super::config::LookupConfig;
use super::error::EngineError;
use crate::core::energy::table::EnergyTableSet;
use crate::core::models::assignment::EnergyAssignment;
use crate::core::models::key::TableKey;
use crate::core::models::observation::AngleObservation;
use rayon::prelude::*;
use std::collections::HashMap;

/// Per-source counters collected while assigning energies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Observations handed to the run, before any filtering.
    pub observations: usize,
    /// Observations removed by the multi-conformer filter.
    pub filtered_out: usize,
    pub assigned: usize,
    /// Assigned observations whose angle is missing (and so carry no energy).
    pub missing_angles: usize,
    /// Observations dropped because their table is absent.
    pub without_table: usize,
    /// Assigned observations that found no partner in the other source.
    pub unmatched: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReport {
    /// Assigned observations, in input order, with normalized angles.
    pub assignments: Vec<EnergyAssignment>,
    /// Every `(residue type, chi)` key seen in the input, sorted.
    pub partitions: Vec<TableKey>,
    /// Keys with no energy table, sorted.
    pub skipped_partitions: Vec<TableKey>,
    pub stats: SourceStats,
}

/// Observations sharing one table key, as indices into the input.
struct Partition {
    key: TableKey,
    members: Vec<usize>,
}

fn partition(observations: &[AngleObservation]) -> Vec<Partition> {
    let mut slots: HashMap<TableKey, usize> = HashMap::new();
    let mut partitions: Vec<Partition> = Vec::new();
    for (index, obs) in observations.iter().enumerate() {
        let key = obs.table_key();
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            partitions.push(Partition {
                key,
                members: Vec::new(),
            });
            partitions.len() - 1
        });
        partitions[slot].members.push(index);
    }
    partitions
}

/// Looks up the energy of every observation in one partition.
///
/// Returns `Ok(None)` when the partition has no table.
fn lookup_partition(
    partition: &Partition,
    observations: &[AngleObservation],
    tables: &EnergyTableSet,
    config: &LookupConfig,
) -> Result<Option<Vec<Option<f64>>>, EngineError> {
    let Some(table) = tables.get(&partition.key) else {
        return Ok(None);
    };
    partition
        .members
        .iter()
        .map(|&i| {
            table
                .lookup(observations[i].angle, config.boundary, config.fallback)
                .map_err(|source| EngineError::Lookup {
                    key: partition.key.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Normalizes every angle and assigns it the energy from its `(residue type, chi)` table.
///
/// Partitions are looked up in parallel; the result keeps the input order. Observations
/// whose table is absent are left out and their keys reported as skipped.
pub fn assign(
    observations: &[AngleObservation],
    tables: &EnergyTableSet,
    config: &LookupConfig,
) -> Result<AssignmentReport, EngineError> {
    let normalized: Vec<AngleObservation> =
        observations.iter().map(AngleObservation::normalized).collect();
    let partitions = partition(&normalized);

    let energies_by_partition = partitions
        .par_iter()
        .map(|p| lookup_partition(p, &normalized, tables, config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut slots: Vec<Option<Option<f64>>> = vec![None; normalized.len()];
    let mut skipped_partitions = Vec::new();
    let mut without_table = 0;
    for (partition, energies) in partitions.iter().zip(energies_by_partition) {
        match energies {
            Some(energies) => {
                for (&index, energy) in partition.members.iter().zip(energies) {
                    slots[index] = Some(energy);
                }
            }
            None => {
                without_table += partition.members.len();
                skipped_partitions.push(partition.key.clone());
            }
        }
    }
    skipped_partitions.sort();

    let mut keys: Vec<TableKey> = partitions.into_iter().map(|p| p.key).collect();
    keys.sort();

    let assignments: Vec<EnergyAssignment> = normalized
        .into_iter()
        .zip(slots)
        .filter_map(|(observation, slot)| {
            slot.map(|energy| EnergyAssignment {
                observation,
                energy,
            })
        })
        .collect();

    let stats = SourceStats {
        observations: observations.len(),
        assigned: assignments.len(),
        missing_angles: assignments
            .iter()
            .filter(|a| a.observation.angle.is_none())
            .count(),
        without_table,
        ..SourceStats::default()
    };

    Ok(AssignmentReport {
        assignments,
        partitions: keys,
        skipped_partitions,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::energy::lookup::{BoundaryPolicy, FallbackPolicy, LookupError};
    use crate::core::energy::table::{EnergyBin, EnergyTable};
    use crate::core::models::chi::ChiIndex;
    use crate::core::models::observation::Source;

    fn table(name: &str, bins: &[(f64, f64, f64)]) -> EnergyTable {
        EnergyTable::new(
            name.parse().unwrap(),
            bins.iter()
                .map(|&(bin_min, bin_max, energy)| EnergyBin {
                    bin_min,
                    bin_max,
                    energy,
                })
                .collect(),
        )
    }

    fn obs(
        residue: &str,
        residue_type: &str,
        chi: ChiIndex,
        angle: Option<f64>,
    ) -> AngleObservation {
        AngleObservation::new("A", residue, residue_type, chi, angle, Source::Baseline)
    }

    #[test]
    fn assign_keeps_input_order_across_partitions() {
        let tables: EnergyTableSet = [
            table("SER_CHI1", &[(0.0, 180.0, 1.0), (180.0, 360.0, 2.0)]),
            table("VAL_CHI1", &[(0.0, 180.0, 3.0), (180.0, 360.0, 4.0)]),
        ]
        .into_iter()
        .collect();
        let observations = vec![
            obs("1", "SER", ChiIndex::Chi1, Some(10.0)),
            obs("2", "VAL", ChiIndex::Chi1, Some(200.0)),
            obs("3", "SER", ChiIndex::Chi1, Some(-10.0)),
            obs("4", "VAL", ChiIndex::Chi1, Some(90.0)),
        ];

        let report = assign(&observations, &tables, &LookupConfig::default()).unwrap();
        let residues: Vec<_> = report
            .assignments
            .iter()
            .map(|a| a.observation.residue_id.as_str())
            .collect();
        let energies: Vec<_> = report.assignments.iter().map(|a| a.energy).collect();

        assert_eq!(residues, vec!["1", "2", "3", "4"]);
        assert_eq!(energies, vec![Some(1.0), Some(4.0), Some(2.0), Some(3.0)]);
        assert_eq!(report.assignments[2].observation.angle, Some(350.0));
        assert_eq!(report.partitions.len(), 2);
        assert!(report.skipped_partitions.is_empty());
    }

    #[test]
    fn partitions_without_a_table_are_skipped() {
        let tables: EnergyTableSet = [table("SER_CHI1", &[(0.0, 360.0, 1.0)])]
            .into_iter()
            .collect();
        let observations = vec![
            obs("1", "SER", ChiIndex::Chi1, Some(10.0)),
            obs("2", "ARG", ChiIndex::Chi4, Some(10.0)),
            obs("3", "ARG", ChiIndex::Chi4, Some(20.0)),
        ];

        let report = assign(&observations, &tables, &LookupConfig::default()).unwrap();
        assert_eq!(report.assignments.len(), 1);
        assert_eq!(report.skipped_partitions, vec!["ARG_CHI4".parse().unwrap()]);
        assert_eq!(report.stats.without_table, 2);
        assert_eq!(report.stats.observations, 3);
        assert_eq!(report.stats.assigned, 1);
    }

    #[test]
    fn missing_angles_are_assigned_without_energy() {
        let tables: EnergyTableSet = [table("SER_CHI1", &[(0.0, 360.0, 1.0)])]
            .into_iter()
            .collect();
        let observations = vec![obs("1", "SER", ChiIndex::Chi1, None)];

        let report = assign(&observations, &tables, &LookupConfig::default()).unwrap();
        assert_eq!(report.assignments[0].energy, None);
        assert_eq!(report.stats.missing_angles, 1);
    }

    #[test]
    fn invalid_fallback_surfaces_as_lookup_error() {
        let tables: EnergyTableSet = [table("SER_CHI1", &[(0.0, 10.0, 1.0)])]
            .into_iter()
            .collect();
        let config = LookupConfig {
            boundary: BoundaryPolicy::StrictInterior,
            fallback: FallbackPolicy {
                default_maximum: false,
                fallback_value: None,
            },
        };

        let inside = vec![obs("1", "SER", ChiIndex::Chi1, Some(5.0))];
        assert!(assign(&inside, &tables, &config).is_ok());

        let outside = vec![obs("1", "SER", ChiIndex::Chi1, Some(50.0))];
        let err = assign(&outside, &tables, &config).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Lookup {
                source: LookupError::InvalidFallbackConfiguration,
                ..
            }
        ));
    }
}
