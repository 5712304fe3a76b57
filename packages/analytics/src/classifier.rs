//! Risk classification from complaint volume and air quality.
//!
//! The thresholds are fixed contract values, not tuning knobs. A missing
//! PM2.5 average never satisfies a PM2.5 condition.

use civic_risk_analytics_models::RiskLevel;

/// Complaint count that must be exceeded for [`RiskLevel::High`].
pub const HIGH_COMPLAINTS: u64 = 10;

/// Mean PM2.5 that must be exceeded for [`RiskLevel::High`].
pub const HIGH_PM25: f64 = 150.0;

/// Complaint count that must be exceeded for [`RiskLevel::Medium`].
pub const MEDIUM_COMPLAINTS: u64 = 5;

/// Mean PM2.5 that must be exceeded for [`RiskLevel::Medium`].
pub const MEDIUM_PM25: f64 = 100.0;

/// Classifies an area.
///
/// * `High` when complaints exceed 10 **and** mean PM2.5 exceeds 150.
/// * `Medium` when complaints exceed 5 **or** mean PM2.5 exceeds 100.
/// * `Low` otherwise.
#[must_use]
pub fn classify(complaint_count: u64, avg_pm25: Option<f64>) -> RiskLevel {
    let pm25_above = |threshold: f64| avg_pm25.is_some_and(|v| v > threshold);

    if complaint_count > HIGH_COMPLAINTS && pm25_above(HIGH_PM25) {
        RiskLevel::High
    } else if complaint_count > MEDIUM_COMPLAINTS || pm25_above(MEDIUM_PM25) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_cases() {
        assert_eq!(classify(0, None), RiskLevel::Low);
        assert_eq!(classify(6, None), RiskLevel::Medium);
        assert_eq!(classify(0, Some(101.0)), RiskLevel::Medium);
        assert_eq!(classify(11, Some(151.0)), RiskLevel::High);
        assert_eq!(classify(11, Some(149.0)), RiskLevel::Medium);
    }

    #[test]
    fn missing_pm25_blocks_high() {
        assert_eq!(classify(11, None), RiskLevel::Medium);
        assert_eq!(classify(1_000, None), RiskLevel::Medium);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify(10, Some(500.0)), RiskLevel::Medium);
        assert_eq!(classify(11, Some(150.0)), RiskLevel::Medium);
        assert_eq!(classify(5, None), RiskLevel::Low);
        assert_eq!(classify(5, Some(100.0)), RiskLevel::Low);
        assert_eq!(classify(0, Some(100.01)), RiskLevel::Medium);
    }

    #[test]
    fn high_exactly_when_both_conditions_hold() {
        let counts = [0, 5, 6, 10, 11, 50];
        let averages = [None, Some(0.0), Some(100.0), Some(120.0), Some(150.0), Some(151.0)];

        for c in counts {
            for a in averages {
                let expect_high = c > 10 && a.is_some_and(|v| v > 150.0);
                assert_eq!(
                    classify(c, a) == RiskLevel::High,
                    expect_high,
                    "classify({c}, {a:?})"
                );
            }
        }
    }
}
