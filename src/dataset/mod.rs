//! The in-memory visit dataset shared by every aggregate.

pub mod derive;

use crate::models::VisitRecord;
use crate::utils::time::LocalZone;

pub use derive::recompute;

/// Visits ordered by `visit_time` once ingest has finished a refresh.
///
/// Only ingest appends and only [`derive::recompute`] edits records in place;
/// aggregates borrow the dataset read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<VisitRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `visit_time` of the earliest record.
    pub fn start_time(&self) -> Option<i64> {
        self.records.first().map(|r| r.visit_time)
    }

    /// `visit_time` of the latest record.
    pub fn end_time(&self) -> Option<i64> {
        self.records.last().map(|r| r.visit_time)
    }

    /// Add freshly joined records, then restore ordering and derived fields
    /// across the whole dataset.
    pub fn extend_and_recompute<I>(&mut self, records: I, max_dwell_hours: f64, zone: LocalZone)
    where
        I: IntoIterator<Item = VisitRecord>,
    {
        self.records.extend(records);
        self.records.sort_by_key(|r| r.visit_time);
        recompute(&mut self.records, max_dwell_hours, zone);
    }
}

#[cfg(test)]
impl Dataset {
    /// Build a sorted, derived dataset directly from records.
    pub(crate) fn from_records(
        records: Vec<VisitRecord>,
        max_dwell_hours: f64,
        zone: LocalZone,
    ) -> Self {
        let mut dataset = Self::new();
        dataset.extend_and_recompute(records, max_dwell_hours, zone);
        dataset
    }
}
