use super::table::EnergyBin;
use thiserror::Error;

/// How an angle is tested against the bounds of a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// `bin_min < angle < bin_max`. Angles exactly on an edge match no bin.
    #[default]
    StrictInterior,
    /// `bin_min < angle <= bin_max`. Angles on an upper edge belong to that bin.
    ClosedUpper,
}

impl BoundaryPolicy {
    #[inline]
    pub fn contains(self, bin: &EnergyBin, angle: f64) -> bool {
        match self {
            BoundaryPolicy::StrictInterior => bin.bin_min < angle && angle < bin.bin_max,
            BoundaryPolicy::ClosedUpper => bin.bin_min < angle && angle <= bin.bin_max,
        }
    }
}

/// What to return when no bin contains the angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPolicy {
    /// Use the highest energy of the whole table.
    pub default_maximum: bool,
    /// Explicit value used when `default_maximum` is off.
    pub fallback_value: Option<f64>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            default_maximum: true,
            fallback_value: None,
        }
    }
}

impl FallbackPolicy {
    pub fn table_maximum() -> Self {
        Self::default()
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            default_maximum: false,
            fallback_value: Some(value),
        }
    }

    /// Checks that the policy can produce a value without needing a lookup.
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.default_maximum || self.fallback_value.is_some() {
            Ok(())
        } else {
            Err(LookupError::InvalidFallbackConfiguration)
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error(
        "Invalid fallback configuration: a fallback value is required when the table maximum is not used"
    )]
    InvalidFallbackConfiguration,
}

/// Looks up the energy for `angle` in an ordered set of bins.
///
/// A missing angle yields a missing energy without consulting the bins or the
/// fallback. When bins overlap, the first matching row wins. When none match,
/// `fallback` decides the result; with `default_maximum` the result is `None`
/// only if `bins` is empty.
///
/// # Errors
///
/// Returns [`LookupError::InvalidFallbackConfiguration`] when no bin matches and
/// the fallback policy provides neither the table maximum nor an explicit value.
pub fn lookup(
    angle: Option<f64>,
    bins: &[EnergyBin],
    policy: BoundaryPolicy,
    fallback: FallbackPolicy,
) -> Result<Option<f64>, LookupError> {
    let Some(angle) = angle else {
        return Ok(None);
    };

    if let Some(bin) = bins.iter().find(|bin| policy.contains(bin, angle)) {
        return Ok(Some(bin.energy));
    }

    if fallback.default_maximum {
        return Ok(max_energy(bins));
    }
    fallback
        .fallback_value
        .map(Some)
        .ok_or(LookupError::InvalidFallbackConfiguration)
}

/// Highest energy across all bins, ignoring NaN entries.
pub fn max_energy(bins: &[EnergyBin]) -> Option<f64> {
    bins.iter()
        .map(|bin| bin.energy)
        .filter(|e| !e.is_nan())
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(bin_min: f64, bin_max: f64, energy: f64) -> EnergyBin {
        EnergyBin {
            bin_min,
            bin_max,
            energy,
        }
    }

    fn two_bins() -> Vec<EnergyBin> {
        vec![bin(0.0, 10.0, 1.0), bin(10.0, 20.0, 5.0)]
    }

    #[test]
    fn angle_inside_bin_returns_its_energy() {
        let energy = lookup(
            Some(15.0),
            &two_bins(),
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::default(),
        );
        assert_eq!(energy, Ok(Some(5.0)));
    }

    #[test]
    fn missing_angle_propagates_for_every_policy() {
        let policies = [BoundaryPolicy::StrictInterior, BoundaryPolicy::ClosedUpper];
        let fallbacks = [
            FallbackPolicy::default(),
            FallbackPolicy::fixed(2.0),
            FallbackPolicy {
                default_maximum: false,
                fallback_value: None,
            },
        ];
        for policy in policies {
            for fallback in fallbacks {
                assert_eq!(lookup(None, &two_bins(), policy, fallback), Ok(None));
                assert_eq!(lookup(None, &[], policy, fallback), Ok(None));
            }
        }
    }

    #[test]
    fn out_of_range_angle_uses_table_maximum_by_default() {
        let energy = lookup(
            Some(25.0),
            &two_bins(),
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::default(),
        );
        assert_eq!(energy, Ok(Some(5.0)));
    }

    #[test]
    fn out_of_range_angle_uses_explicit_fallback_value() {
        let energy = lookup(
            Some(25.0),
            &two_bins(),
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::fixed(2.0),
        );
        assert_eq!(energy, Ok(Some(2.0)));
    }

    #[test]
    fn zero_is_a_valid_explicit_fallback_value() {
        let energy = lookup(
            Some(25.0),
            &two_bins(),
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::fixed(0.0),
        );
        assert_eq!(energy, Ok(Some(0.0)));
    }

    #[test]
    fn out_of_range_angle_without_any_fallback_is_an_error() {
        let energy = lookup(
            Some(25.0),
            &two_bins(),
            BoundaryPolicy::StrictInterior,
            FallbackPolicy {
                default_maximum: false,
                fallback_value: None,
            },
        );
        assert_eq!(energy, Err(LookupError::InvalidFallbackConfiguration));
    }

    #[test]
    fn strict_interior_does_not_match_upper_edge() {
        let bins = vec![bin(0.0, 10.0, 1.0)];
        let strict = lookup(
            Some(10.0),
            &bins,
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::fixed(-3.0),
        );
        assert_eq!(strict, Ok(Some(-3.0)));

        let closed = lookup(
            Some(10.0),
            &bins,
            BoundaryPolicy::ClosedUpper,
            FallbackPolicy::fixed(-3.0),
        );
        assert_eq!(closed, Ok(Some(1.0)));
    }

    #[test]
    fn lower_edge_is_open_for_both_policies() {
        let bins = vec![bin(0.0, 10.0, 1.0)];
        for policy in [BoundaryPolicy::StrictInterior, BoundaryPolicy::ClosedUpper] {
            assert_eq!(
                lookup(Some(0.0), &bins, policy, FallbackPolicy::fixed(7.0)),
                Ok(Some(7.0))
            );
        }
    }

    #[test]
    fn overlapping_bins_resolve_to_first_listed_row() {
        let bins = vec![bin(0.0, 10.0, 1.0), bin(5.0, 15.0, 9.0)];
        for _ in 0..10 {
            let energy = lookup(
                Some(7.0),
                &bins,
                BoundaryPolicy::StrictInterior,
                FallbackPolicy::default(),
            );
            assert_eq!(energy, Ok(Some(1.0)));
        }
    }

    #[test]
    fn table_maximum_of_empty_table_is_missing() {
        let energy = lookup(
            Some(10.0),
            &[],
            BoundaryPolicy::StrictInterior,
            FallbackPolicy::default(),
        );
        assert_eq!(energy, Ok(None));
    }

    #[test]
    fn max_energy_ignores_nan_rows() {
        let bins = vec![bin(0.0, 1.0, f64::NAN), bin(1.0, 2.0, 3.5)];
        assert_eq!(max_energy(&bins), Some(3.5));
    }

    #[test]
    fn fallback_validation_matches_lookup_behavior() {
        assert!(FallbackPolicy::default().validate().is_ok());
        assert!(FallbackPolicy::fixed(1.0).validate().is_ok());
        assert_eq!(
            FallbackPolicy {
                default_maximum: false,
                fallback_value: None
            }
            .validate(),
            Err(LookupError::InvalidFallbackConfiguration)
        );
    }
}
