#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for area risk summaries and outbreak prediction.
//!
//! [`AreaSummary`] rows back the map/dashboard view. [`FeatureVector`] is
//! the exact input schema of the external outbreak predictor and
//! [`PredictionResult`] is its interpreted verdict. None of these are
//! persisted; they are rebuilt on every request.

use civic_risk_records_models::GeoPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Ordinal risk classification. Ordered `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RiskLevel {
    /// No threshold crossed
    Low,
    /// Elevated complaints or air pollution
    Medium,
    /// Both complaints and air pollution elevated
    High,
}

impl RiskLevel {
    /// Returns all variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Aggregated view of one area for map display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    /// Area key.
    pub area: String,
    /// Location of the first record seen for this area.
    pub location: Option<GeoPoint>,
    /// Number of health incidents.
    #[serde(rename = "healthIncidentCount")]
    pub incident_count: u64,
    /// Number of sanitation complaints.
    #[serde(rename = "sanitationComplaintCount")]
    pub complaint_count: u64,
    /// Mean PM2.5 over air readings, two decimals. `None` without samples.
    #[serde(rename = "avgPM25")]
    pub avg_pm25: Option<f64>,
    /// Derived from `complaint_count` and `avg_pm25` only.
    pub risk_level: RiskLevel,
}

/// Input to the outbreak predictor.
///
/// Field declaration order is the predictor's column order and is
/// preserved by serialization. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Incidents in the last 7 days.
    pub health_incidents_last_7d: u64,
    /// Incidents in the last 14 days.
    pub health_incidents_last_14d: u64,
    /// Dengue incidents in the last 7 days.
    pub dengue_incidents_last_7d: u64,
    /// Malaria incidents in the last 7 days.
    pub malaria_incidents_last_7d: u64,
    /// Complaints currently open, regardless of age.
    pub open_sanitation_complaints: u64,
    /// Complaints filed in the last 7 days.
    pub total_sanitation_complaints_last_7d: u64,
    /// Mean PM2.5 over 7 days, `0` without samples.
    pub avg_pm25_last_7d: f64,
    /// Mean PM10 over 7 days, `0` without samples.
    pub avg_pm10_last_7d: f64,
    /// Peak PM2.5 over 7 days, `0` without samples.
    pub max_pm25_last_7d: f64,
}

impl FeatureVector {
    /// Number of features.
    pub const LEN: usize = 9;

    /// Feature names in predictor column order.
    pub const FIELD_NAMES: [&'static str; Self::LEN] = [
        "health_incidents_last_7d",
        "health_incidents_last_14d",
        "dengue_incidents_last_7d",
        "malaria_incidents_last_7d",
        "open_sanitation_complaints",
        "total_sanitation_complaints_last_7d",
        "avg_pm25_last_7d",
        "avg_pm10_last_7d",
        "max_pm25_last_7d",
    ];

    /// Feature values in predictor column order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn values(&self) -> [f64; Self::LEN] {
        [
            self.health_incidents_last_7d as f64,
            self.health_incidents_last_14d as f64,
            self.dengue_incidents_last_7d as f64,
            self.malaria_incidents_last_7d as f64,
            self.open_sanitation_complaints as f64,
            self.total_sanitation_complaints_last_7d as f64,
            self.avg_pm25_last_7d,
            self.avg_pm10_last_7d,
            self.max_pm25_last_7d,
        ]
    }

    /// `(name, value)` pairs in predictor column order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::FIELD_NAMES.into_iter().zip(self.values())
    }
}

/// The predictor's verdict for one feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Outbreak probability in `[0, 1]`.
    pub probability: f64,
    /// Risk band reported by the predictor.
    pub risk_level: RiskLevel,
    /// Most influential drivers, strongest first.
    pub top_drivers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector() -> FeatureVector {
        FeatureVector {
            health_incidents_last_7d: 4,
            health_incidents_last_14d: 9,
            dengue_incidents_last_7d: 2,
            malaria_incidents_last_7d: 1,
            open_sanitation_complaints: 6,
            total_sanitation_complaints_last_7d: 3,
            avg_pm25_last_7d: 120.5,
            avg_pm10_last_7d: 180.25,
            max_pm25_last_7d: 160.0,
        }
    }

    #[test]
    fn serialized_keys_follow_column_order() {
        let json = serde_json::to_string(&vector()).unwrap();
        let mut last = 0;
        for name in FeatureVector::FIELD_NAMES {
            let pos = json
                .find(&format!("\"{name}\""))
                .unwrap_or_else(|| panic!("{name} missing from {json}"));
            assert!(pos >= last, "{name} out of order in {json}");
            last = pos;
        }
    }

    #[test]
    fn values_line_up_with_names() {
        let named: Vec<_> = vector().named_values().collect();
        assert_eq!(named.len(), FeatureVector::LEN);
        assert_eq!(named[0], ("health_incidents_last_7d", 4.0));
        assert_eq!(named[4], ("open_sanitation_complaints", 6.0));
        assert_eq!(named[8], ("max_pm25_last_7d", 160.0));
    }

    #[test]
    fn risk_level_ordering_and_labels() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("SEVERE".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn area_summary_wire_names() {
        let summary = AreaSummary {
            area: "Pimpri".to_string(),
            location: None,
            incident_count: 3,
            complaint_count: 7,
            avg_pm25: None,
            risk_level: RiskLevel::Medium,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["healthIncidentCount"], 3);
        assert_eq!(value["sanitationComplaintCount"], 7);
        assert!(value["avgPM25"].is_null());
        assert_eq!(value["riskLevel"], "MEDIUM");
    }
}
