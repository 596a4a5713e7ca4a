const FULL_TURN_DEGREES: f64 = 360.0;

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Returns `None` for non-finite input so that unparsable values stay missing
/// instead of turning into a bogus angle.
#[inline]
pub fn normalize_angle(degrees: f64) -> Option<f64> {
    if !degrees.is_finite() {
        return None;
    }
    let wrapped = degrees.rem_euclid(FULL_TURN_DEGREES);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= FULL_TURN_DEGREES {
        Some(0.0)
    } else {
        Some(wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn angles_in_range_are_unchanged() {
        assert_eq!(normalize_angle(0.0), Some(0.0));
        assert_eq!(normalize_angle(180.0), Some(180.0));
        assert_eq!(normalize_angle(359.5), Some(359.5));
    }

    #[test]
    fn negative_angles_map_into_positive_range() {
        assert_eq!(normalize_angle(-60.0), Some(300.0));
        assert_eq!(normalize_angle(-180.0), Some(180.0));
        assert_eq!(normalize_angle(-360.0), Some(0.0));
    }

    #[test]
    fn unbounded_angles_wrap_around() {
        assert_eq!(normalize_angle(360.0), Some(0.0));
        assert_eq!(normalize_angle(725.0), Some(5.0));
        assert!(f64_approx_equal(normalize_angle(-1085.5).unwrap(), 354.5));
    }

    #[test]
    fn tiny_negative_angle_never_reaches_full_turn() {
        let wrapped = normalize_angle(-1e-20).unwrap();
        assert!((0.0..360.0).contains(&wrapped));
    }

    #[test]
    fn non_finite_angles_are_missing() {
        assert_eq!(normalize_angle(f64::NAN), None);
        assert_eq!(normalize_angle(f64::INFINITY), None);
        assert_eq!(normalize_angle(f64::NEG_INFINITY), None);
    }

    #[test]
    fn normalization_is_idempotent_and_in_range() {
        let samples = [
            -1e6, -720.0, -359.999, -90.0, -0.5, 0.0, 0.5, 90.0, 359.999, 360.0, 1234.5, 1e6,
        ];
        for angle in samples {
            let once = normalize_angle(angle).unwrap();
            let twice = normalize_angle(once).unwrap();
            assert_eq!(once, twice, "not idempotent for {angle}");
            assert!((0.0..360.0).contains(&once), "{angle} mapped to {once}");
        }
    }
}
