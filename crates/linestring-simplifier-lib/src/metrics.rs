//! Quality metrics and warnings for a simplification

use crate::FillOutcome;

/// Length preservation below this percentage produces a warning
pub const LENGTH_WARNING_THRESHOLD_PCT: f64 = 95.0;

/// Using less than this fraction of the budget produces a warning
pub const UNDERUSED_BUDGET_FRACTION: f64 = 0.5;

/// Reported percentages are rounded to this many steps per unit
const PERCENT_STEPS: f64 = 1e6;

/// Round a percentage so that exact results (e.g. 100 %) compare exactly
#[inline]
fn round_percentage(value: f64) -> f64 {
    (value * PERCENT_STEPS).round() / PERCENT_STEPS
}

/// Percentage of coordinates removed: `(1 − simplified/original) × 100`
pub fn reduction_ratio(original_count: usize, simplified_count: usize) -> f64 {
    if original_count == 0 {
        return 0.0;
    }
    round_percentage((1.0 - simplified_count as f64 / original_count as f64) * 100.0)
}

/// Simplified path length as a percentage of the original path length
///
/// Returns 0 when the original length is not positive (validated polylines always have
/// a positive length, so this only guards direct callers).
pub fn length_preserved(original_length: f64, simplified_length: f64) -> f64 {
    if original_length <= 0.0 {
        return 0.0;
    }
    round_percentage(simplified_length / original_length * 100.0)
}

/// Warnings about the quality of a finished simplification
pub(crate) fn quality_warnings(
    simplified_count: usize,
    max_coordinates: usize,
    length_preserved: f64,
    fill: &FillOutcome,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if fill.budget_starved() {
        warnings.push(format!(
            "Coordinate budget exhausted with up to {:.1} m of deviation unresolved. \
             Consider increasing max_coordinates for better accuracy.",
            fill.max_unresolved_deviation
        ));
    }

    if (simplified_count as f64) < max_coordinates as f64 * UNDERUSED_BUDGET_FRACTION {
        warnings.push(format!(
            "Simplified geometry uses only {} of {} allowed coordinates. \
             The original geometry may be very simple.",
            simplified_count, max_coordinates
        ));
    }

    if length_preserved < LENGTH_WARNING_THRESHOLD_PCT {
        warnings.push(format!(
            "Length preservation is {:.1}%. Consider increasing max_coordinates for better accuracy.",
            length_preserved
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(max_unresolved_deviation: f64) -> FillOutcome {
        FillOutcome {
            indices: vec![0, 1],
            added: 0,
            max_unresolved_deviation,
        }
    }

    #[test]
    fn test_reduction_ratio() {
        assert_eq!(reduction_ratio(8, 8), 0.0);
        assert_eq!(reduction_ratio(8, 2), 75.0);
        assert_eq!(reduction_ratio(3, 2), 33.333333);
        assert_eq!(reduction_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_length_preserved_rounds_to_exact_hundred() {
        let original = 4.0 * 111_194.926_644_558_73;
        let simplified = 444_779.706_578_234_9;
        assert_eq!(length_preserved(original, simplified), 100.0);
        assert_eq!(length_preserved(200.0, 100.0), 50.0);
        assert_eq!(length_preserved(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_quality_warnings() {
        assert!(quality_warnings(10, 10, 99.0, &fill(0.0)).is_empty());

        let starved = quality_warnings(10, 10, 99.0, &fill(12.5));
        assert_eq!(starved.len(), 1);
        assert!(starved[0].contains("12.5 m"));

        let underused = quality_warnings(2, 10, 100.0, &fill(0.0));
        assert_eq!(underused.len(), 1);
        assert!(underused[0].contains("only 2 of 10"));

        let short = quality_warnings(10, 10, 80.0, &fill(0.0));
        assert_eq!(short.len(), 1);
        assert!(short[0].contains("80.0%"));
    }
}
