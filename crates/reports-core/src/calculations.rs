//! Expense-per-hour rate arithmetic.

/// Hour totals closer than this to an integer count as whole hours.
///
/// Durations are entered as short decimals (`1,5`, `0,25`), so sums of them
/// can land a few ULPs away from the integer they represent.
pub const WHOLE_HOUR_TOLERANCE: f64 = 1e-9;

/// Stateless rate policy shared by the per-period and cumulative columns.
pub struct RateCalculator;

impl RateCalculator {
    /// Expense per whole hour, rounded half-to-even.
    ///
    /// Returns:
    /// * `None` when `hours` has a fractional part: a partial-hour total is
    ///   never rated.
    /// * `Some(0)` when `hours` is zero.
    /// * `Some(round(expense / hours))` otherwise.
    pub fn rate_per_hour(expense: f64, hours: f64) -> Option<i64> {
        if !Self::is_whole(hours) {
            return None;
        }
        let whole_hours = hours.round();
        if whole_hours == 0.0 {
            return Some(0);
        }
        Some(round_half_even(expense / whole_hours) as i64)
    }

    /// Plain expense / hours ratio with no whole-hour guard.
    ///
    /// Returns `None` when `hours` is zero.
    pub fn average_rate(expense: f64, hours: f64) -> Option<f64> {
        if hours == 0.0 {
            return None;
        }
        Some(expense / hours)
    }

    /// Whether `hours` is a finite whole number (within tolerance).
    pub fn is_whole(hours: f64) -> bool {
        hours.is_finite() && (hours - hours.round()).abs() < WHOLE_HOUR_TOLERANCE
    }
}

/// Round to the nearest integer, sending exact `.5` ties to the even neighbour.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_whole_hours() {
        assert_eq!(RateCalculator::rate_per_hour(25_000.0, 5.0), Some(5_000));
    }

    #[test]
    fn test_rate_zero_hours_is_zero() {
        assert_eq!(RateCalculator::rate_per_hour(25_000.0, 0.0), Some(0));
        assert_eq!(RateCalculator::rate_per_hour(0.0, 0.0), Some(0));
    }

    #[test]
    fn test_rate_fractional_hours_is_suppressed() {
        assert_eq!(RateCalculator::rate_per_hour(25_000.0, 4.5), None);
        assert_eq!(RateCalculator::rate_per_hour(0.0, 0.25), None);
    }

    #[test]
    fn test_rate_rounds_quotient() {
        // 10_000 / 3 = 3333.33…
        assert_eq!(RateCalculator::rate_per_hour(10_000.0, 3.0), Some(3_333));
        // 20_000 / 3 = 6666.66…
        assert_eq!(RateCalculator::rate_per_hour(20_000.0, 3.0), Some(6_667));
    }

    #[test]
    fn test_rate_ties_round_to_even() {
        // 5 / 2 = 2.5 → 2, 7 / 2 = 3.5 → 4, 9 / 2 = 4.5 → 4
        assert_eq!(RateCalculator::rate_per_hour(5.0, 2.0), Some(2));
        assert_eq!(RateCalculator::rate_per_hour(7.0, 2.0), Some(4));
        assert_eq!(RateCalculator::rate_per_hour(9.0, 2.0), Some(4));
        assert_eq!(RateCalculator::rate_per_hour(-5.0, 2.0), Some(-2));
    }

    #[test]
    fn test_rate_tolerates_float_noise_in_whole_sums() {
        let hours = 0.1 + 0.2 + 0.7; // 1.0 give or take one ULP
        assert_eq!(RateCalculator::rate_per_hour(1_000.0, hours), Some(1_000));
    }

    #[test]
    fn test_rate_rejects_non_finite_hours() {
        assert_eq!(RateCalculator::rate_per_hour(1.0, f64::NAN), None);
        assert_eq!(RateCalculator::rate_per_hour(1.0, f64::INFINITY), None);
    }

    #[test]
    fn test_average_rate() {
        assert_eq!(RateCalculator::average_rate(9_000.0, 4.5), Some(2_000.0));
        assert_eq!(RateCalculator::average_rate(9_000.0, 0.0), None);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(2.6), 3.0);
    }
}
