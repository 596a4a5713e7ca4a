use super::chi::{ChiIndex, ChiIndexError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies one energy table: a residue type paired with a chi angle.
///
/// The canonical string form is `"{RESIDUE}_{CHI}"`, e.g. `SER_CHI1`, which is also
/// the file stem used for tables on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey {
    pub residue_type: String,
    pub chi: ChiIndex,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableKeyError {
    #[error("Table key '{0}' is not of the form RESIDUE_CHIn")]
    Malformed(String),
    #[error("Table key '{key}' has an invalid chi label: {source}")]
    Chi {
        key: String,
        source: ChiIndexError,
    },
}

impl TableKey {
    pub fn new(residue_type: &str, chi: ChiIndex) -> Self {
        Self {
            residue_type: residue_type.trim().to_ascii_uppercase(),
            chi,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.residue_type, self.chi.table_label())
    }
}

impl FromStr for TableKey {
    type Err = TableKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (residue, chi) = s
            .trim()
            .rsplit_once('_')
            .ok_or_else(|| TableKeyError::Malformed(s.to_string()))?;
        if residue.is_empty() || !chi.to_ascii_lowercase().starts_with("chi") {
            return Err(TableKeyError::Malformed(s.to_string()));
        }
        let chi = chi.parse::<ChiIndex>().map_err(|e| TableKeyError::Chi {
            key: s.to_string(),
            source: e,
        })?;
        Ok(Self::new(residue, chi))
    }
}
