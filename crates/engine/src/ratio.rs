//! Safe ratio derivation.

/// Returns `numerator / denominator` when the denominator is positive, and
/// `None` otherwise.
///
/// Every ratio the engine reports goes through this function so that "no
/// data" stays distinguishable from "exactly zero". A zero or negative
/// denominator is an absent ratio, never `0.0`, never `NaN`.
///
/// ```rust
/// use engine::safe_ratio;
///
/// assert_eq!(safe_ratio(50.0, 100.0), Some(0.5));
/// assert_eq!(safe_ratio(50.0, 0.0), None);
/// ```
#[must_use]
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::safe_ratio;

    #[test]
    fn positive_denominator_divides() {
        assert_eq!(safe_ratio(30.0, 120.0), Some(0.25));
    }

    #[test]
    fn zero_denominator_is_absent() {
        assert_eq!(safe_ratio(100.0, 0.0), None);
        assert_eq!(safe_ratio(0.0, 0.0), None);
    }

    #[test]
    fn negative_denominator_is_absent() {
        assert_eq!(safe_ratio(100.0, -5.0), None);
    }
}
