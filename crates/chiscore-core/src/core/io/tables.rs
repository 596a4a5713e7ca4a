use crate::core::energy::table::{EnergyBin, EnergyTable, EnergyTableSet};
use crate::core::models::key::{TableKey, TableKeyError};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TABLE_EXTENSION: &str = "csv";

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Energy table file name '{path}' does not name a table: {source}")]
    InvalidName {
        path: String,
        source: TableKeyError,
    },
    #[error("Energy table '{path}' contains no bins")]
    Empty { path: String },
}

/// Result of reading a directory of energy tables.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub tables: EnergyTableSet,
    /// CSV files whose names do not follow the `RESIDUE_CHIn.csv` convention.
    pub skipped: Vec<PathBuf>,
}

/// Derives the table key from a file name: everything before the first `.`.
pub fn table_key_for_path(path: &Path) -> Result<TableKey, TableLoadError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.parse::<TableKey>()
        .map_err(|e| TableLoadError::InvalidName {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
}

/// Reads one energy table with `bin min`, `bin max` and `E` columns, keeping row order.
pub fn load_table_file(path: &Path) -> Result<EnergyTable, TableLoadError> {
    let key = table_key_for_path(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TableLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    let mut bins = Vec::new();
    for result in reader.deserialize::<EnergyBin>() {
        let bin = result.map_err(|e| TableLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        bins.push(bin);
    }

    if bins.is_empty() {
        return Err(TableLoadError::Empty {
            path: path.to_string_lossy().to_string(),
        });
    }

    Ok(EnergyTable::new(key, bins))
}

/// Reads every `*.csv` table in `dir`.
///
/// Files whose names are not table keys are reported in [`LoadedTables::skipped`];
/// a malformed or empty table aborts the load.
pub fn load_table_dir(dir: &Path) -> Result<LoadedTables, TableLoadError> {
    let mut paths = list_csv_files(dir)?;
    paths.sort();

    let mut loaded = LoadedTables::default();
    for path in paths {
        match table_key_for_path(&path) {
            Ok(_) => {
                let table = load_table_file(&path)?;
                loaded.tables.insert(table);
            }
            Err(TableLoadError::InvalidName { .. }) => loaded.skipped.push(path),
            Err(e) => return Err(e),
        }
    }
    Ok(loaded)
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, TableLoadError> {
    let io_error = |e| TableLoadError::Io {
        path: dir.to_string_lossy().to_string(),
        source: e,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    Ok(paths)
}
