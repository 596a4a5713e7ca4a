use crate::core::models::chi::{ChiIndex, ChiIndexError};
use crate::core::models::observation::{AngleObservation, Source};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BASELINE_SUFFIX: &str = "rotamers_output.csv";
pub const ALTERNATIVE_SUFFIX: &str = "qFit_rotamers_output.csv";

#[derive(Debug, Error)]
pub enum ObservationLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid chi index in '{path}' at line {line}: {source}")]
    Chi {
        path: String,
        line: usize,
        source: ChiIndexError,
    },
}

/// One row of a rotamer extraction file. Column names follow the extraction output,
/// with the renamed forms accepted as aliases.
#[derive(Debug, Deserialize)]
struct RotamerRow {
    chain: String,
    residue: String,
    #[serde(rename = "residue_name", alias = "residue_type")]
    residue_name: String,
    #[serde(rename = "nchi", alias = "chi_angle", alias = "chi")]
    nchi: String,
    #[serde(rename = "rotamer_value", alias = "angle")]
    rotamer_value: String,
    #[serde(default)]
    altloc: Option<String>,
}

impl RotamerRow {
    fn into_observation(
        self,
        source: Source,
        path: &Path,
        line: usize,
    ) -> Result<AngleObservation, ObservationLoadError> {
        let chi = self
            .nchi
            .parse::<ChiIndex>()
            .map_err(|e| ObservationLoadError::Chi {
                path: path.to_string_lossy().to_string(),
                line,
                source: e,
            })?;
        let angle = self
            .rotamer_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite());

        let observation = AngleObservation::new(
            &self.chain,
            &self.residue,
            &self.residue_name,
            chi,
            angle,
            source,
        );
        Ok(match self.altloc {
            Some(tag) => observation.with_alt_location(&tag),
            None => observation,
        })
    }
}

/// Lists files in `dir` whose names end with `suffix`, sorted by path.
///
/// Names also ending with `exclude_suffix` are left out, so a baseline suffix that is a
/// tail of the alternative suffix does not pick up alternative files.
pub fn discover_files(
    dir: &Path,
    suffix: &str,
    exclude_suffix: Option<&str>,
) -> Result<Vec<PathBuf>, ObservationLoadError> {
    let io_error = |e| ObservationLoadError::Io {
        path: dir.to_string_lossy().to_string(),
        source: e,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let excluded = exclude_suffix.is_some_and(|ex| ex != suffix && name.ends_with(ex));
        if name.ends_with(suffix) && !excluded {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parses one rotamer extraction CSV into observations tagged with `source`.
///
/// Unparsable angle values become missing angles. An unrecognized chi index fails
/// the whole file.
pub fn load_observation_file(
    path: &Path,
    source: Source,
) -> Result<Vec<AngleObservation>, ObservationLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ObservationLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    let mut observations = Vec::new();
    for (index, result) in reader.deserialize::<RotamerRow>().enumerate() {
        let row = result.map_err(|e| ObservationLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        // header occupies line 1
        observations.push(row.into_observation(source, path, index + 2)?);
    }
    Ok(observations)
}
