//! Per-area aggregation for the risk map.
//!
//! Incidents, complaints, and air readings are joined on their area key.
//! Records are processed incidents first, then complaints, then readings;
//! the first record seen for an area fixes that area's location.

use std::collections::BTreeMap;

use civic_risk_analytics_models::AreaSummary;
use civic_risk_records_models::{
    Complaint, EnvironmentalReading, GeoPoint, Incident, ReadingKind,
};
use civic_risk_store::{ComplaintFilter, IncidentFilter, ReadingFilter, RecordStore};

use crate::{AnalyticsError, classifier, mean, round_hundredths};

#[derive(Debug)]
struct AreaAccumulator {
    location: Option<GeoPoint>,
    incident_count: u64,
    complaint_count: u64,
    pm25_samples: Vec<f64>,
}

impl AreaAccumulator {
    const fn new(location: Option<GeoPoint>) -> Self {
        Self {
            location,
            incident_count: 0,
            complaint_count: 0,
            pm25_samples: Vec::new(),
        }
    }
}

fn entry<'a, 'r>(
    areas: &'a mut BTreeMap<&'r str, AreaAccumulator>,
    area: &'r str,
    location: Option<GeoPoint>,
) -> &'a mut AreaAccumulator {
    areas
        .entry(area)
        .or_insert_with(|| AreaAccumulator::new(location))
}

/// Joins the three record sets into one summary per area.
///
/// Only air readings contribute; water readings are skipped entirely and
/// never introduce an area. Output is sorted by risk level (highest
/// first), then by area name ascending. Identical inputs always produce
/// identical output.
#[must_use]
pub fn summarize(
    incidents: &[Incident],
    complaints: &[Complaint],
    readings: &[EnvironmentalReading],
) -> Vec<AreaSummary> {
    let mut areas: BTreeMap<&str, AreaAccumulator> = BTreeMap::new();

    for incident in incidents {
        entry(&mut areas, &incident.area, incident.location).incident_count += 1;
    }

    for complaint in complaints {
        entry(&mut areas, &complaint.area, complaint.location).complaint_count += 1;
    }

    for reading in readings.iter().filter(|r| r.kind() == ReadingKind::Air) {
        let acc = entry(&mut areas, &reading.area, reading.location);
        if let Some(pm25) = reading.pm25() {
            acc.pm25_samples.push(pm25);
        }
    }

    let mut summaries: Vec<AreaSummary> = areas
        .into_iter()
        .map(|(area, acc)| {
            let avg_pm25 = mean(&acc.pm25_samples).map(round_hundredths);
            AreaSummary {
                area: area.to_string(),
                location: acc.location,
                incident_count: acc.incident_count,
                complaint_count: acc.complaint_count,
                avg_pm25,
                risk_level: classifier::classify(acc.complaint_count, avg_pm25),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.risk_level
            .cmp(&a.risk_level)
            .then_with(|| a.area.cmp(&b.area))
    });

    summaries
}

/// Reads every incident, complaint, and air reading concurrently and
/// summarizes them.
///
/// # Errors
///
/// Returns [`AnalyticsError::Store`] if any of the three reads fails. No
/// partial summary is produced.
pub async fn fetch_area_summary(
    store: &dyn RecordStore,
) -> Result<Vec<AreaSummary>, AnalyticsError> {
    let incident_filter = IncidentFilter::default();
    let complaint_filter = ComplaintFilter::default();
    let reading_filter = ReadingFilter::of_kind(ReadingKind::Air);

    let (incidents, complaints, readings) = futures::try_join!(
        store.find_incidents(&incident_filter),
        store.find_complaints(&complaint_filter),
        store.find_readings(&reading_filter),
    )?;

    log::debug!(
        "Summarizing {} incidents, {} complaints, {} air readings",
        incidents.len(),
        complaints.len(),
        readings.len()
    );

    Ok(summarize(&incidents, &complaints, &readings))
}
