use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the (up to four) side-chain dihedral angles of an amino-acid residue.
///
/// Rotamer extraction pipelines encode the chi index as a zero-based integer
/// (`0` for chi1 through `3` for chi4), while energy tables label it as `CHI1`..`CHI4`.
/// Both encodings parse into this enum; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChiIndex {
    Chi1,
    Chi2,
    Chi3,
    Chi4,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChiIndexError {
    #[error("Unknown chi index '{0}'. Expected 0-3 or chi1-chi4.")]
    Unknown(String),
}

impl ChiIndex {
    pub const ALL: [ChiIndex; 4] = [
        ChiIndex::Chi1,
        ChiIndex::Chi2,
        ChiIndex::Chi3,
        ChiIndex::Chi4,
    ];

    /// Zero-based position, matching the integer encoding of the extraction output.
    pub fn position(self) -> usize {
        match self {
            ChiIndex::Chi1 => 0,
            ChiIndex::Chi2 => 1,
            ChiIndex::Chi3 => 2,
            ChiIndex::Chi4 => 3,
        }
    }

    /// Lower-case label used in observation data (`chi1`).
    pub fn label(self) -> &'static str {
        match self {
            ChiIndex::Chi1 => "chi1",
            ChiIndex::Chi2 => "chi2",
            ChiIndex::Chi3 => "chi3",
            ChiIndex::Chi4 => "chi4",
        }
    }

    /// Upper-case label used in energy table keys (`CHI1`).
    pub fn table_label(self) -> &'static str {
        match self {
            ChiIndex::Chi1 => "CHI1",
            ChiIndex::Chi2 => "CHI2",
            ChiIndex::Chi3 => "CHI3",
            ChiIndex::Chi4 => "CHI4",
        }
    }
}

impl TryFrom<i64> for ChiIndex {
    type Error = ChiIndexError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChiIndex::Chi1),
            1 => Ok(ChiIndex::Chi2),
            2 => Ok(ChiIndex::Chi3),
            3 => Ok(ChiIndex::Chi4),
            other => Err(ChiIndexError::Unknown(other.to_string())),
        }
    }
}

impl FromStr for ChiIndex {
    type Err = ChiIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(position) = trimmed.parse::<i64>() {
            return ChiIndex::try_from(position);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "chi1" => Ok(ChiIndex::Chi1),
            "chi2" => Ok(ChiIndex::Chi2),
            "chi3" => Ok(ChiIndex::Chi3),
            "chi4" => Ok(ChiIndex::Chi4),
            _ => Err(ChiIndexError::Unknown(trimmed.to_string())),
        }
    }
}

impl fmt::Display for ChiIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_encoding_maps_to_chi_angles() {
        assert_eq!(ChiIndex::try_from(0), Ok(ChiIndex::Chi1));
        assert_eq!(ChiIndex::try_from(1), Ok(ChiIndex::Chi2));
        assert_eq!(ChiIndex::try_from(2), Ok(ChiIndex::Chi3));
        assert_eq!(ChiIndex::try_from(3), Ok(ChiIndex::Chi4));
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        assert_eq!(
            ChiIndex::try_from(4),
            Err(ChiIndexError::Unknown("4".to_string()))
        );
        assert!(ChiIndex::try_from(-1).is_err());
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("chi2".parse::<ChiIndex>(), Ok(ChiIndex::Chi2));
        assert_eq!("CHI3".parse::<ChiIndex>(), Ok(ChiIndex::Chi3));
        assert_eq!(" 0 ".parse::<ChiIndex>(), Ok(ChiIndex::Chi1));
    }

    #[test]
    fn unrecognized_labels_fail_instead_of_passing_through() {
        assert!("chi5".parse::<ChiIndex>().is_err());
        assert!("phi".parse::<ChiIndex>().is_err());
        assert!("".parse::<ChiIndex>().is_err());
    }

    #[test]
    fn position_round_trips_through_integer_encoding() {
        for chi in ChiIndex::ALL {
            assert_eq!(ChiIndex::try_from(chi.position() as i64), Ok(chi));
        }
    }

    #[test]
    fn display_uses_lower_case_label() {
        assert_eq!(ChiIndex::Chi4.to_string(), "chi4");
        assert_eq!(ChiIndex::Chi4.table_label(), "CHI4");
    }
}
