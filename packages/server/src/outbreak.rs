//! Outbreak risk assessment for a single area.

use chrono::{DateTime, Utc};
use civic_risk_analytics::{AnalyticsError, features};
use civic_risk_predictor::{PredictionError, Predictor};
use civic_risk_server_models::{ApiOutbreakRisk, PREDICTION_WINDOW};
use civic_risk_store::RecordStore;

/// Errors that can occur while assessing outbreak risk.
#[derive(Debug, thiserror::Error)]
pub enum OutbreakError {
    /// No usable area name was supplied.
    #[error("Please provide an area name (e.g., ?area=Pimpri)")]
    Validation,

    /// Reading the area's records failed.
    #[error("Feature error: {0}")]
    Features(#[from] AnalyticsError),

    /// The predictor failed or returned something unusable.
    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),
}

/// Returns the trimmed area name, rejecting missing or blank input.
///
/// # Errors
///
/// Returns [`OutbreakError::Validation`] if `area` is absent or blank.
pub fn validate_area(area: Option<&str>) -> Result<&str, OutbreakError> {
    area.map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(OutbreakError::Validation)
}

/// Converts a probability in `[0, 1]` to a percentage with one decimal.
#[must_use]
pub fn probability_percent(probability: f64) -> f64 {
    (probability * 1000.0).round() / 10.0
}

/// Builds the area's features as of `now`, asks the predictor for a
/// verdict, and shapes the response.
///
/// # Errors
///
/// * [`OutbreakError::Features`] if a store query fails
/// * [`OutbreakError::Prediction`] if the predictor fails
pub async fn assess(
    store: &dyn RecordStore,
    predictor: &dyn Predictor,
    area: &str,
    now: DateTime<Utc>,
) -> Result<ApiOutbreakRisk, OutbreakError> {
    let features = features::build_features(store, area, now).await?;
    let prediction = predictor.predict(&features).await?;

    Ok(ApiOutbreakRisk {
        area: area.to_string(),
        outbreak_probability: probability_percent(prediction.probability),
        risk_level: prediction.risk_level,
        prediction_window: PREDICTION_WINDOW.to_string(),
        top_drivers: prediction.top_drivers,
        timestamp: now,
    })
}
