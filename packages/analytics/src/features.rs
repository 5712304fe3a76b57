//! Outbreak feature vector construction.
//!
//! Builds the nine-column input of the outbreak predictor for one area
//! from two trailing windows ending at `now`: 7 days and 14 days, both
//! bounds inclusive.
//!
//! Unlike the area summary, a missing PM value here is reported as `0`,
//! not as an absent value. The predictor was trained on that convention.

use chrono::{DateTime, Utc};
use civic_risk_analytics_models::FeatureVector;
use civic_risk_records_models::{ComplaintStatus, DiseaseType, EnvironmentalReading, ReadingKind};
use civic_risk_store::{ComplaintFilter, IncidentFilter, ReadingFilter, RecordStore, TimeWindow};

use crate::{AnalyticsError, mean, round_hundredths};

/// Length of the short trailing window in days.
pub const SHORT_WINDOW_DAYS: i64 = 7;

/// Length of the long trailing window in days.
pub const LONG_WINDOW_DAYS: i64 = 14;

/// Builds the feature vector for `area` as of `now`.
///
/// Issues the six counts and the air-reading fetch concurrently.
///
/// # Errors
///
/// Returns [`AnalyticsError::Store`] if any store query fails.
pub async fn build_features(
    store: &dyn RecordStore,
    area: &str,
    now: DateTime<Utc>,
) -> Result<FeatureVector, AnalyticsError> {
    let short = TimeWindow::trailing_days(now, SHORT_WINDOW_DAYS);
    let long = TimeWindow::trailing_days(now, LONG_WINDOW_DAYS);

    let incidents_short = IncidentFilter::for_area(area).within(short);
    let incidents_long = IncidentFilter::for_area(area).within(long);
    let dengue_short = incidents_short.clone().disease(DiseaseType::Dengue);
    let malaria_short = incidents_short.clone().disease(DiseaseType::Malaria);
    let open_complaints = ComplaintFilter::for_area(area).status(ComplaintStatus::Open);
    let complaints_short = ComplaintFilter::for_area(area).within(short);
    let air_short = ReadingFilter::of_kind(ReadingKind::Air)
        .in_area(area)
        .within(short);

    log::debug!("Building features for area={area} as of {now}");

    let (
        health_incidents_last_7d,
        health_incidents_last_14d,
        dengue_incidents_last_7d,
        malaria_incidents_last_7d,
        open_sanitation_complaints,
        total_sanitation_complaints_last_7d,
        air_readings,
    ) = futures::try_join!(
        store.count_incidents(&incidents_short),
        store.count_incidents(&incidents_long),
        store.count_incidents(&dengue_short),
        store.count_incidents(&malaria_short),
        store.count_complaints(&open_complaints),
        store.count_complaints(&complaints_short),
        store.find_readings(&air_short),
    )?;

    let air = AirStats::from_readings(&air_readings);

    Ok(FeatureVector {
        health_incidents_last_7d,
        health_incidents_last_14d,
        dengue_incidents_last_7d,
        malaria_incidents_last_7d,
        open_sanitation_complaints,
        total_sanitation_complaints_last_7d,
        avg_pm25_last_7d: air.avg_pm25,
        avg_pm10_last_7d: air.avg_pm10,
        max_pm25_last_7d: air.max_pm25,
    })
}

/// Particulate statistics over a set of air readings, zero when empty.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AirStats {
    avg_pm25: f64,
    avg_pm10: f64,
    max_pm25: f64,
}

impl AirStats {
    fn from_readings(readings: &[EnvironmentalReading]) -> Self {
        let pm25: Vec<f64> = readings
            .iter()
            .filter_map(EnvironmentalReading::pm25)
            .collect();
        let pm10: Vec<f64> = readings
            .iter()
            .filter_map(EnvironmentalReading::pm10)
            .collect();

        Self {
            avg_pm25: mean(&pm25).map_or(0.0, round_hundredths),
            avg_pm10: mean(&pm10).map_or(0.0, round_hundredths),
            max_pm25: pm25
                .iter()
                .copied()
                .reduce(f64::max)
                .map_or(0.0, round_hundredths),
        }
    }
}
