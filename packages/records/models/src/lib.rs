#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Civic record types shared across the civic-risk workspace.
//!
//! Health incidents, sanitation complaints, and environmental readings are
//! produced by external ingestion and are read-only to the risk pipeline.
//! Every record carries an `area` key that groups records geographically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Disease recorded on a health incident.
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
#[strum(ascii_case_insensitive)]
pub enum DiseaseType {
    /// Dengue fever
    Dengue,
    /// Malaria
    Malaria,
    /// COVID-19
    Covid,
    /// Cholera
    Cholera,
    /// Anything not covered above
    Other,
}

impl DiseaseType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Dengue,
            Self::Malaria,
            Self::Covid,
            Self::Cholera,
            Self::Other,
        ]
    }
}

/// Clinical severity of a health incident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentSeverity {
    /// Mild case
    Low,
    /// Moderate case
    #[default]
    Medium,
    /// Severe case
    High,
}

/// A reported health incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Area key.
    pub area: String,
    /// Disease category.
    pub disease_type: DiseaseType,
    /// Case severity.
    #[serde(default)]
    pub severity: IncidentSeverity,
    /// When the incident was reported.
    pub reported_at: DateTime<Utc>,
    /// Where the incident was reported, if geocoded.
    pub location: Option<GeoPoint>,
}

/// Type of sanitation complaint.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplaintCategory {
    /// Garbage collection and dumping
    WasteManagement,
    /// Blocked or overflowing drains
    Drainage,
    /// Public toilet upkeep
    PublicToilet,
    /// Contaminated or interrupted supply
    WaterSupply,
    /// Street sweeping
    StreetCleaning,
    /// Anything not covered above
    Other,
}

/// Lifecycle state of a sanitation complaint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplaintStatus {
    /// Filed and not yet picked up. Older feeds call this `pending`.
    #[default]
    #[serde(alias = "pending")]
    #[strum(to_string = "open", serialize = "pending")]
    Open,
    /// Being worked on
    InProgress,
    /// Closed as fixed
    Resolved,
    /// Closed without action
    Rejected,
}

/// Handling priority attached to a complaint.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

/// A citizen sanitation complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Area key.
    pub area: String,
    /// Complaint type.
    pub category: ComplaintCategory,
    /// Current status.
    #[serde(default)]
    pub status: ComplaintStatus,
    /// When the complaint was filed.
    pub reported_at: DateTime<Utc>,
    /// Where the complaint was filed, if geocoded.
    pub location: Option<GeoPoint>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Handling priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Which instrument family produced an [`EnvironmentalReading`].
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReadingKind {
    /// Air quality station
    Air,
    /// Water quality probe
    Water,
}

/// Measurements carried by a reading. Air and water metrics never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Measurements {
    /// Air quality metrics (µg/m³ for particulates, ppm for CO₂).
    Air {
        /// Fine particulate matter.
        pm25: Option<f64>,
        /// Coarse particulate matter.
        pm10: Option<f64>,
        /// Air quality index (0-500).
        aqi: Option<f64>,
        /// Carbon dioxide.
        co2: Option<f64>,
    },
    /// Water quality metrics.
    Water {
        /// Composite water quality index.
        water_quality_index: Option<f64>,
        /// Acidity (0-14).
        ph: Option<f64>,
        /// Turbidity in NTU.
        turbidity: Option<f64>,
        /// Dissolved oxygen in mg/L.
        dissolved_oxygen: Option<f64>,
    },
}

impl Measurements {
    /// Builds an air measurement with only particulate values set.
    #[must_use]
    pub const fn air(pm25: Option<f64>, pm10: Option<f64>) -> Self {
        Self::Air {
            pm25,
            pm10,
            aqi: None,
            co2: None,
        }
    }

    /// Builds a water measurement with only the quality index set.
    #[must_use]
    pub const fn water(water_quality_index: Option<f64>) -> Self {
        Self::Water {
            water_quality_index,
            ph: None,
            turbidity: None,
            dissolved_oxygen: None,
        }
    }
}

/// A single environmental sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalReading {
    /// Area key.
    pub area: String,
    /// When the reading was taken.
    pub recorded_at: DateTime<Utc>,
    /// Sensor location, if known.
    pub location: Option<GeoPoint>,
    /// Kind-specific measurements.
    #[serde(flatten)]
    pub measurements: Measurements,
}

impl EnvironmentalReading {
    /// Returns which instrument family produced this reading.
    #[must_use]
    pub const fn kind(&self) -> ReadingKind {
        match self.measurements {
            Measurements::Air { .. } => ReadingKind::Air,
            Measurements::Water { .. } => ReadingKind::Water,
        }
    }

    /// PM2.5 value, if this is an air reading that carries one.
    #[must_use]
    pub const fn pm25(&self) -> Option<f64> {
        match self.measurements {
            Measurements::Air { pm25, .. } => pm25,
            Measurements::Water { .. } => None,
        }
    }

    /// PM10 value, if this is an air reading that carries one.
    #[must_use]
    pub const fn pm10(&self) -> Option<f64> {
        match self.measurements {
            Measurements::Air { pm10, .. } => pm10,
            Measurements::Water { .. } => None,
        }
    }

    /// Water quality index, if this is a water reading that carries one.
    #[must_use]
    pub const fn water_quality_index(&self) -> Option<f64> {
        match self.measurements {
            Measurements::Water {
                water_quality_index,
                ..
            } => water_quality_index,
            Measurements::Air { .. } => None,
        }
    }
}
