#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Record store adapter for civic records.
//!
//! The risk pipeline treats incidents, complaints, and environmental
//! readings as three queryable collections behind the [`RecordStore`]
//! trait. Each collection supports "find records matching a filter" and,
//! where the pipeline needs it, "count records matching a filter".
//!
//! [`memory::MemoryStore`] is the bundled backend: it loads a JSON record
//! file once and answers every query by filtering in memory.

pub mod filter;
pub mod memory;

use async_trait::async_trait;
use civic_risk_records_models::{Complaint, EnvironmentalReading, Incident};

pub use filter::{ComplaintFilter, IncidentFilter, ReadingFilter, TimeWindow};

/// Errors that can occur while reading from a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the backing file failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data could not be decoded.
    #[error("Store parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected or failed the query.
    #[error("Store backend error: {message}")]
    Backend {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read-only access to the three civic record collections.
///
/// `find_*` methods return matching records ordered most-recent-first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns health incidents matching `filter`.
    async fn find_incidents(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, StoreError>;

    /// Counts health incidents matching `filter`.
    async fn count_incidents(&self, filter: &IncidentFilter) -> Result<u64, StoreError>;

    /// Returns sanitation complaints matching `filter`.
    async fn find_complaints(&self, filter: &ComplaintFilter)
    -> Result<Vec<Complaint>, StoreError>;

    /// Counts sanitation complaints matching `filter`.
    async fn count_complaints(&self, filter: &ComplaintFilter) -> Result<u64, StoreError>;

    /// Returns environmental readings matching `filter`.
    async fn find_readings(
        &self,
        filter: &ReadingFilter,
    ) -> Result<Vec<EnvironmentalReading>, StoreError>;
}
