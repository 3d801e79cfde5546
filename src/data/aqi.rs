//! AQI severity categories

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity band of an Air Quality Index value
///
/// Each band is inclusive of its upper bound: 50 is still Good, 51 is Moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiCategory {
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else {
            AqiCategory::VeryUnhealthy
        }
    }

    /// Human-readable description
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        let cases = [
            (0.0, AqiCategory::Good),
            (49.0, AqiCategory::Good),
            (50.0, AqiCategory::Good),
            (51.0, AqiCategory::Moderate),
            (100.0, AqiCategory::Moderate),
            (101.0, AqiCategory::UnhealthyForSensitiveGroups),
            (150.0, AqiCategory::UnhealthyForSensitiveGroups),
            (151.0, AqiCategory::Unhealthy),
            (200.0, AqiCategory::Unhealthy),
            (201.0, AqiCategory::VeryUnhealthy),
            (500.0, AqiCategory::VeryUnhealthy),
        ];

        for (aqi, expected) in cases {
            assert_eq!(AqiCategory::from_aqi(aqi), expected, "aqi {}", aqi);
        }
    }

    #[test]
    fn test_fractional_values_above_bound_move_up() {
        assert_eq!(AqiCategory::from_aqi(50.5), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(200.1), AqiCategory::VeryUnhealthy);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AqiCategory::Good.label(), "Good");
        assert_eq!(AqiCategory::Moderate.label(), "Moderate");
        assert_eq!(
            AqiCategory::UnhealthyForSensitiveGroups.to_string(),
            "Unhealthy for Sensitive Groups"
        );
        assert_eq!(AqiCategory::Unhealthy.label(), "Unhealthy");
        assert_eq!(AqiCategory::VeryUnhealthy.label(), "Very Unhealthy");
    }

    #[test]
    fn test_categories_ordered_by_severity() {
        assert!(AqiCategory::Good < AqiCategory::Moderate);
        assert!(AqiCategory::Unhealthy < AqiCategory::VeryUnhealthy);
    }
}
