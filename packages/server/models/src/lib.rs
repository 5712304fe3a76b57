#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the civic risk server.
//!
//! Every JSON body carries a `success` flag. Collections are wrapped with
//! their `count`; failures carry an `error` string and, for data
//! endpoints, a human-readable `message`.

use chrono::{DateTime, Utc};
use civic_risk_analytics_models::RiskLevel;
use serde::{Deserialize, Serialize};

/// Prediction horizon reported alongside every outbreak estimate.
pub const PREDICTION_WINDOW: &str = "Next 7 days";

/// A successful collection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiList<T> {
    /// Always `true`.
    pub success: bool,
    /// Number of items in `data`.
    pub count: usize,
    /// The items.
    pub data: Vec<T>,
}

impl<T> ApiList<T> {
    /// Wraps `data` in a success envelope.
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// A successful single-object response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiData<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T> ApiData<T> {
    /// Wraps `data` in a success envelope.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A failure response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Always `false`.
    pub success: bool,
    /// What the server was trying to do.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// What went wrong, as much as the client is allowed to see.
    pub error: String,
}

impl ApiFailure {
    /// A failure with only an error string.
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: error.into(),
        }
    }

    /// A failure with a message describing the failed operation.
    #[must_use]
    pub fn with_message(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: error.into(),
        }
    }
}

/// Query parameters for the outbreak risk endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutbreakRiskParams {
    /// Area to assess.
    pub area: Option<String>,
}

/// Outbreak estimate for one area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOutbreakRisk {
    /// Area assessed.
    pub area: String,
    /// Outbreak probability as a percentage, one decimal.
    pub outbreak_probability: f64,
    /// Risk band reported by the predictor.
    pub risk_level: RiskLevel,
    /// Horizon of the estimate.
    pub prediction_window: String,
    /// Most influential drivers.
    pub top_drivers: Vec<String>,
    /// When the estimate was produced.
    pub timestamp: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Human-readable status.
    pub status: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Deployment environment name.
    pub environment: String,
    /// Service version.
    pub version: String,
}

/// Endpoint directory returned from the API root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoints {
    /// Health check.
    pub health: String,
    /// Health incident listing.
    pub health_incidents: String,
    /// Sanitation complaint listing.
    pub sanitation_complaints: String,
    /// Environmental reading listing.
    pub environmental_data: String,
    /// Per-area risk summary.
    pub area_summary: String,
    /// Outbreak risk prediction.
    pub outbreak_risk: String,
}

/// Service banner returned from the API root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiServiceInfo {
    /// Service name.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Available endpoints.
    pub endpoints: ApiEndpoints,
}
