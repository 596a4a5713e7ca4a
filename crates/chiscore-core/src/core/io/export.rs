use crate::core::models::assignment::{ComparisonRecord, EnergyAssignment};
use crate::core::models::summary::GroupSummary;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct AssignmentRow<'a> {
    source: &'a str,
    chain: &'a str,
    residue: &'a str,
    altloc: &'a str,
    residue_type: &'a str,
    chi_angle: &'a str,
    #[serde(rename = "AA_CHI")]
    aa_chi: String,
    angle: Option<f64>,
    #[serde(rename = "E")]
    energy: Option<f64>,
}

impl<'a> From<&'a EnergyAssignment> for AssignmentRow<'a> {
    fn from(a: &'a EnergyAssignment) -> Self {
        let obs = &a.observation;
        Self {
            source: obs.source.label(),
            chain: &obs.chain,
            residue: &obs.residue_id,
            altloc: &obs.alt_location,
            residue_type: &obs.residue_type,
            chi_angle: obs.chi.label(),
            aa_chi: obs.table_key().to_string(),
            angle: obs.angle,
            energy: a.energy,
        }
    }
}

#[derive(Debug, Serialize)]
struct ComparisonRow<'a> {
    chain: &'a str,
    residue: &'a str,
    residue_type: &'a str,
    chi_angle: &'a str,
    #[serde(rename = "AA_CHI")]
    aa_chi: String,
    altloc_baseline: &'a str,
    altloc_alternative: &'a str,
    angle_baseline: Option<f64>,
    angle_alternative: Option<f64>,
    energy_baseline: Option<f64>,
    energy_alternative: Option<f64>,
    delta_energy: Option<f64>,
    delta_angle: Option<f64>,
}

impl<'a> From<&'a ComparisonRecord> for ComparisonRow<'a> {
    fn from(r: &'a ComparisonRecord) -> Self {
        Self {
            chain: &r.chain,
            residue: &r.residue_id,
            residue_type: &r.residue_type,
            chi_angle: r.chi.label(),
            aa_chi: r.key().to_string(),
            altloc_baseline: &r.baseline_alt_location,
            altloc_alternative: &r.alternative_alt_location,
            angle_baseline: r.baseline_angle,
            angle_alternative: r.alternative_angle,
            energy_baseline: r.baseline_energy,
            energy_alternative: r.alternative_energy,
            delta_energy: r.energy_delta,
            delta_angle: r.angle_delta,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    #[serde(rename = "AA_CHI")]
    aa_chi: String,
    records: usize,
    energy_pairs: usize,
    mean_delta_energy: Option<f64>,
    angle_pairs: usize,
    mean_delta_angle: Option<f64>,
}

impl From<&GroupSummary> for SummaryRow {
    fn from(s: &GroupSummary) -> Self {
        Self {
            aa_chi: s.key.to_string(),
            records: s.records,
            energy_pairs: s.energy_pairs,
            mean_delta_energy: s.mean_energy_delta,
            angle_pairs: s.angle_pairs,
            mean_delta_angle: s.mean_angle_delta,
        }
    }
}

pub fn write_assignments(path: &Path, assignments: &[EnergyAssignment]) -> Result<(), ExportError> {
    write_rows(path, assignments.iter().map(AssignmentRow::from))
}

pub fn write_comparisons(path: &Path, records: &[ComparisonRecord]) -> Result<(), ExportError> {
    write_rows(path, records.iter().map(ComparisonRow::from))
}

pub fn write_summaries(path: &Path, summaries: &[GroupSummary]) -> Result<(), ExportError> {
    write_rows(path, summaries.iter().map(SummaryRow::from))
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl Iterator<Item = T>,
) -> Result<(), ExportError> {
    let csv_error = |e| ExportError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| ExportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
