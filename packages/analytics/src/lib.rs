#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk analytics over civic records.
//!
//! * [`classifier`] maps complaint volume and mean PM2.5 to a
//!   [`RiskLevel`](civic_risk_analytics_models::RiskLevel).
//! * [`aggregator`] joins incidents, complaints, and air readings into one
//!   [`AreaSummary`](civic_risk_analytics_models::AreaSummary) per area.
//! * [`features`] builds the predictor's fixed-order feature vector for a
//!   single area over trailing 7- and 14-day windows.
//!
//! Everything here is computed per request; nothing is cached.

pub mod aggregator;
pub mod classifier;
pub mod features;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A record store read failed.
    #[error("Store error: {0}")]
    Store(#[from] civic_risk_store::StoreError),
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
