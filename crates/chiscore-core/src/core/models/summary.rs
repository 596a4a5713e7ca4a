use super::assignment::ComparisonRecord;
use super::key::TableKey;
use std::collections::BTreeMap;

/// Descriptive aggregate of the comparison records sharing one table key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: TableKey,
    pub records: usize,
    /// Records where both energies were present.
    pub energy_pairs: usize,
    pub mean_energy_delta: Option<f64>,
    /// Records where both angles were present.
    pub angle_pairs: usize,
    pub mean_angle_delta: Option<f64>,
}

impl GroupSummary {
    /// Groups records by table key, in key order.
    pub fn from_records(records: &[ComparisonRecord]) -> Vec<GroupSummary> {
        let mut groups: BTreeMap<TableKey, Vec<&ComparisonRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.key()).or_default().push(record);
        }

        groups
            .into_iter()
            .map(|(key, members)| {
                let (energy_pairs, mean_energy_delta) =
                    mean(members.iter().filter_map(|r| r.energy_delta));
                let (angle_pairs, mean_angle_delta) =
                    mean(members.iter().filter_map(|r| r.angle_delta));
                GroupSummary {
                    key,
                    records: members.len(),
                    energy_pairs,
                    mean_energy_delta,
                    angle_pairs,
                    mean_angle_delta,
                }
            })
            .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> (usize, Option<f64>) {
    let (count, sum) = values.fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
    if count == 0 {
        (0, None)
    } else {
        (count, Some(sum / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chi::ChiIndex;

    fn record(residue_type: &str, chi: ChiIndex, energy_delta: Option<f64>) -> ComparisonRecord {
        ComparisonRecord {
            chain: "A".to_string(),
            residue_id: "1".to_string(),
            residue_type: residue_type.to_string(),
            chi,
            baseline_alt_location: String::new(),
            alternative_alt_location: "A".to_string(),
            baseline_angle: Some(10.0),
            alternative_angle: Some(30.0),
            baseline_energy: Some(1.0),
            alternative_energy: energy_delta.map(|d| 1.0 + d),
            angle_delta: Some(20.0),
            energy_delta,
        }
    }

    #[test]
    fn summaries_are_grouped_by_key_in_sorted_order() {
        let records = vec![
            record("THR", ChiIndex::Chi1, Some(2.0)),
            record("SER", ChiIndex::Chi1, Some(1.0)),
            record("SER", ChiIndex::Chi1, Some(3.0)),
        ];
        let summaries = GroupSummary::from_records(&records);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].key.to_string(), "SER_CHI1");
        assert_eq!(summaries[0].records, 2);
        assert_eq!(summaries[0].mean_energy_delta, Some(2.0));
        assert_eq!(summaries[1].key.to_string(), "THR_CHI1");
        assert_eq!(summaries[1].mean_angle_delta, Some(20.0));
    }

    #[test]
    fn missing_deltas_are_excluded_from_means() {
        let records = vec![
            record("SER", ChiIndex::Chi2, None),
            record("SER", ChiIndex::Chi2, Some(4.0)),
        ];
        let summary = &GroupSummary::from_records(&records)[0];
        assert_eq!(summary.records, 2);
        assert_eq!(summary.energy_pairs, 1);
        assert_eq!(summary.mean_energy_delta, Some(4.0));
    }

    #[test]
    fn group_with_only_missing_deltas_has_no_mean() {
        let records = vec![record("SER", ChiIndex::Chi1, None)];
        let summary = &GroupSummary::from_records(&records)[0];
        assert_eq!(summary.energy_pairs, 0);
        assert_eq!(summary.mean_energy_delta, None);
    }

    #[test]
    fn no_records_yield_no_summaries() {
        assert!(GroupSummary::from_records(&[]).is_empty());
    }
}
