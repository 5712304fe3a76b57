//! In-memory record store backed by a JSON record file.
//!
//! The file holds all three collections:
//!
//! ```json
//! { "incidents": [...], "complaints": [...], "environmental_data": [...] }
//! ```
//!
//! Records are sorted most-recent-first once at load time so that every
//! `find_*` call can return matches in order without re-sorting.

use std::path::Path;

use async_trait::async_trait;
use civic_risk_records_models::{Complaint, EnvironmentalReading, Incident};
use serde::{Deserialize, Serialize};

use crate::{ComplaintFilter, IncidentFilter, ReadingFilter, RecordStore, StoreError};

/// The on-disk shape of a record file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    /// Health incidents.
    #[serde(default)]
    pub incidents: Vec<Incident>,
    /// Sanitation complaints.
    #[serde(default)]
    pub complaints: Vec<Complaint>,
    /// Air and water readings.
    #[serde(default)]
    pub environmental_data: Vec<EnvironmentalReading>,
}

/// A [`RecordStore`] that holds every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    incidents: Vec<Incident>,
    complaints: Vec<Complaint>,
    readings: Vec<EnvironmentalReading>,
}

impl MemoryStore {
    /// Builds a store from already-materialized records.
    #[must_use]
    pub fn new(records: RecordSet) -> Self {
        let RecordSet {
            mut incidents,
            mut complaints,
            environmental_data: mut readings,
        } = records;

        incidents.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        complaints.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        Self {
            incidents,
            complaints,
            readings,
        }
    }

    /// Loads a JSON record file from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::Parse`] if its contents are not a valid record set.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        log::info!("Loading records from {}", path.display());
        let raw = tokio::fs::read_to_string(path).await?;
        let records: RecordSet = serde_json::from_str(&raw)?;

        log::info!(
            "Loaded {} incidents, {} complaints, {} environmental readings",
            records.incidents.len(),
            records.complaints.len(),
            records.environmental_data.len()
        );

        Ok(Self::new(records))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_incidents(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, StoreError> {
        Ok(self
            .incidents
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn count_incidents(&self, filter: &IncidentFilter) -> Result<u64, StoreError> {
        Ok(self.incidents.iter().filter(|i| filter.matches(i)).count() as u64)
    }

    async fn find_complaints(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, StoreError> {
        Ok(self
            .complaints
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn count_complaints(&self, filter: &ComplaintFilter) -> Result<u64, StoreError> {
        Ok(self.complaints.iter().filter(|c| filter.matches(c)).count() as u64)
    }

    async fn find_readings(
        &self,
        filter: &ReadingFilter,
    ) -> Result<Vec<EnvironmentalReading>, StoreError> {
        Ok(self
            .readings
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}
