//! Query filters for the record collections.
//!
//! All filters are conjunctive: a record matches when every set field
//! matches. Unset fields don't filter.

use chrono::{DateTime, Duration, Utc};
use civic_risk_records_models::{
    Complaint, ComplaintStatus, DiseaseType, EnvironmentalReading, Incident, ReadingKind,
};

/// An inclusive `[from, to]` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Earliest timestamp included.
    pub from: DateTime<Utc>,
    /// Latest timestamp included.
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window covering `[from, to]`.
    #[must_use]
    pub const fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The window of `days` days ending at `now`, i.e. `[now - days, now]`.
    #[must_use]
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            from: now - Duration::days(days),
            to: now,
        }
    }

    /// Whether `at` falls inside the window (both bounds inclusive).
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

fn matches_common(
    area: Option<&str>,
    window: Option<&TimeWindow>,
    record_area: &str,
    at: DateTime<Utc>,
) -> bool {
    area.is_none_or(|a| a == record_area) && window.is_none_or(|w| w.contains(at))
}

/// Filter over health incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    /// Restrict to one area.
    pub area: Option<String>,
    /// Restrict by `reported_at`.
    pub window: Option<TimeWindow>,
    /// Restrict to one disease.
    pub disease_type: Option<DiseaseType>,
}

impl IncidentFilter {
    /// Filter matching every incident in `area`.
    #[must_use]
    pub fn for_area(area: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            ..Self::default()
        }
    }

    /// Adds a time window restriction.
    #[must_use]
    pub const fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Adds a disease restriction.
    #[must_use]
    pub const fn disease(mut self, disease_type: DiseaseType) -> Self {
        self.disease_type = Some(disease_type);
        self
    }

    /// Whether `incident` satisfies this filter.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        matches_common(
            self.area.as_deref(),
            self.window.as_ref(),
            &incident.area,
            incident.reported_at,
        ) && self
            .disease_type
            .is_none_or(|d| d == incident.disease_type)
    }
}

/// Filter over sanitation complaints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Restrict to one area.
    pub area: Option<String>,
    /// Restrict by `reported_at`.
    pub window: Option<TimeWindow>,
    /// Restrict to one status.
    pub status: Option<ComplaintStatus>,
}

impl ComplaintFilter {
    /// Filter matching every complaint in `area`.
    #[must_use]
    pub fn for_area(area: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            ..Self::default()
        }
    }

    /// Adds a time window restriction.
    #[must_use]
    pub const fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Adds a status restriction.
    #[must_use]
    pub const fn status(mut self, status: ComplaintStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether `complaint` satisfies this filter.
    #[must_use]
    pub fn matches(&self, complaint: &Complaint) -> bool {
        matches_common(
            self.area.as_deref(),
            self.window.as_ref(),
            &complaint.area,
            complaint.reported_at,
        ) && self.status.is_none_or(|s| s == complaint.status)
    }
}

/// Filter over environmental readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    /// Restrict to one area.
    pub area: Option<String>,
    /// Restrict by `recorded_at`.
    pub window: Option<TimeWindow>,
    /// Restrict to air or water readings.
    pub kind: Option<ReadingKind>,
}

impl ReadingFilter {
    /// Filter matching every reading of `kind`.
    #[must_use]
    pub fn of_kind(kind: ReadingKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Adds an area restriction.
    #[must_use]
    pub fn in_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Adds a time window restriction.
    #[must_use]
    pub const fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Whether `reading` satisfies this filter.
    #[must_use]
    pub fn matches(&self, reading: &EnvironmentalReading) -> bool {
        matches_common(
            self.area.as_deref(),
            self.window.as_ref(),
            &reading.area,
            reading.recorded_at,
        ) && self.kind.is_none_or(|k| k == reading.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow::trailing_days(at(15), 7);
        assert_eq!(window.from, at(8));
        assert!(window.contains(at(8)));
        assert!(window.contains(at(15)));
        assert!(!window.contains(at(8) - Duration::seconds(1)));
        assert!(!window.contains(at(15) + Duration::seconds(1)));
    }

    #[test]
    fn incident_filter_combines_all_fields() {
        let incident = Incident {
            area: "Pimpri".to_string(),
            disease_type: DiseaseType::Dengue,
            severity: civic_risk_records_models::IncidentSeverity::High,
            reported_at: at(10),
            location: None,
        };

        let window = TimeWindow::trailing_days(at(15), 7);
        assert!(IncidentFilter::default().matches(&incident));
        assert!(
            IncidentFilter::for_area("Pimpri")
                .within(window)
                .disease(DiseaseType::Dengue)
                .matches(&incident)
        );
        assert!(
            !IncidentFilter::for_area("Pimpri")
                .disease(DiseaseType::Malaria)
                .matches(&incident)
        );
        assert!(!IncidentFilter::for_area("Nigdi").matches(&incident));
        assert!(
            !IncidentFilter::for_area("Pimpri")
                .within(TimeWindow::trailing_days(at(30), 7))
                .matches(&incident)
        );
    }
}
