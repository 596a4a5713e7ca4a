use super::assignment::{self, SourceStats};
use super::config::{ComparisonConfig, DeltaConvention, JoinGranularity};
use super::error::EngineError;
use crate::core::energy::table::EnergyTableSet;
use crate::core::models::assignment::{ComparisonRecord, EnergyAssignment};
use crate::core::models::chi::ChiIndex;
use crate::core::models::key::TableKey;
use crate::core::models::observation::AngleObservation;
use crate::core::models::summary::GroupSummary;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonStats {
    pub baseline: SourceStats,
    pub alternative: SourceStats,
    /// Distinct `(residue type, chi)` keys seen in either source.
    pub partitions: usize,
    /// Keys seen in either source that have no energy table, sorted.
    pub skipped_partitions: Vec<TableKey>,
    pub records: usize,
    pub requested_join: JoinGranularity,
    pub effective_join: JoinGranularity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub records: Vec<ComparisonRecord>,
    pub baseline: Vec<EnergyAssignment>,
    pub alternative: Vec<EnergyAssignment>,
    pub stats: ComparisonStats,
}

impl ComparisonReport {
    pub fn summaries(&self) -> Vec<GroupSummary> {
        GroupSummary::from_records(&self.records)
    }
}

/// Residue identity shared by two observations that should be compared.
#[derive(Debug, PartialEq, Eq, Hash)]
struct JoinKey<'a> {
    chain: &'a str,
    residue_id: &'a str,
    residue_type: &'a str,
    chi: ChiIndex,
    alt_location: Option<&'a str>,
}

impl<'a> JoinKey<'a> {
    fn of(observation: &'a AngleObservation, granularity: JoinGranularity) -> Self {
        Self {
            chain: &observation.chain,
            residue_id: &observation.residue_id,
            residue_type: &observation.residue_type,
            chi: observation.chi,
            alt_location: match granularity {
                JoinGranularity::Residue => None,
                JoinGranularity::AltLocation => Some(observation.alt_location.as_str()),
            },
        }
    }
}

/// Alt-location tags only take part in the join when both sources carry them.
fn effective_granularity(
    requested: JoinGranularity,
    baseline: &[AngleObservation],
    alternative: &[AngleObservation],
) -> JoinGranularity {
    match requested {
        JoinGranularity::AltLocation
            if baseline.iter().any(AngleObservation::has_alt_location)
                && alternative.iter().any(AngleObservation::has_alt_location) =>
        {
            JoinGranularity::AltLocation
        }
        _ => JoinGranularity::Residue,
    }
}

fn build_record(
    baseline: &EnergyAssignment,
    alternative: &EnergyAssignment,
    convention: DeltaConvention,
) -> ComparisonRecord {
    let b = &baseline.observation;
    let a = &alternative.observation;
    ComparisonRecord {
        chain: b.chain.clone(),
        residue_id: b.residue_id.clone(),
        residue_type: b.residue_type.clone(),
        chi: b.chi,
        baseline_alt_location: b.alt_location.clone(),
        alternative_alt_location: a.alt_location.clone(),
        baseline_angle: b.angle,
        alternative_angle: a.angle,
        baseline_energy: baseline.energy,
        alternative_energy: alternative.energy,
        angle_delta: convention.apply(b.angle, a.angle),
        energy_delta: convention.apply(baseline.energy, alternative.energy),
    }
}

struct JoinOutcome {
    records: Vec<ComparisonRecord>,
    baseline_unmatched: usize,
    alternative_unmatched: usize,
}

/// Inner join in baseline order; several partners of one baseline entry keep their
/// alternative order.
fn join(
    baseline: &[EnergyAssignment],
    alternative: &[EnergyAssignment],
    granularity: JoinGranularity,
    convention: DeltaConvention,
) -> JoinOutcome {
    let mut index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (i, entry) in alternative.iter().enumerate() {
        index
            .entry(JoinKey::of(&entry.observation, granularity))
            .or_default()
            .push(i);
    }

    let mut matched = vec![false; alternative.len()];
    let mut baseline_unmatched = 0;
    let mut records = Vec::new();
    for entry in baseline {
        match index.get(&JoinKey::of(&entry.observation, granularity)) {
            Some(partners) => {
                for &i in partners {
                    matched[i] = true;
                    records.push(build_record(entry, &alternative[i], convention));
                }
            }
            None => baseline_unmatched += 1,
        }
    }

    JoinOutcome {
        records,
        baseline_unmatched,
        alternative_unmatched: matched.iter().filter(|m| !**m).count(),
    }
}

/// Assigns energies to both sources and pairs up the residues they have in common.
///
/// Angles are normalized into `[0, 360)` first. Observations whose `(residue type, chi)`
/// has no table are dropped from both sides and reported in
/// [`ComparisonStats::skipped_partitions`]. Residues present in only one source produce
/// no record.
pub fn compare(
    baseline: &[AngleObservation],
    alternative: &[AngleObservation],
    tables: &EnergyTableSet,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, EngineError> {
    let kept: Vec<AngleObservation> = if config.multi_conformer_only {
        alternative
            .iter()
            .filter(|o| o.has_alt_location())
            .cloned()
            .collect()
    } else {
        alternative.to_vec()
    };
    let effective_join = effective_granularity(config.join, baseline, &kept);

    let baseline_report = assignment::assign(baseline, tables, &config.lookup)?;
    let alternative_report = assignment::assign(&kept, tables, &config.lookup)?;

    let outcome = join(
        &baseline_report.assignments,
        &alternative_report.assignments,
        effective_join,
        config.delta_convention,
    );

    let partitions: BTreeSet<&TableKey> = baseline_report
        .partitions
        .iter()
        .chain(&alternative_report.partitions)
        .collect();
    let skipped: BTreeSet<&TableKey> = baseline_report
        .skipped_partitions
        .iter()
        .chain(&alternative_report.skipped_partitions)
        .collect();

    let stats = ComparisonStats {
        baseline: SourceStats {
            unmatched: outcome.baseline_unmatched,
            ..baseline_report.stats
        },
        alternative: SourceStats {
            observations: alternative.len(),
            filtered_out: alternative.len() - kept.len(),
            unmatched: outcome.alternative_unmatched,
            ..alternative_report.stats
        },
        partitions: partitions.len(),
        skipped_partitions: skipped.into_iter().cloned().collect(),
        records: outcome.records.len(),
        requested_join: config.join,
        effective_join,
    };

    Ok(ComparisonReport {
        records: outcome.records,
        baseline: baseline_report.assignments,
        alternative: alternative_report.assignments,
        stats,
    })
}
