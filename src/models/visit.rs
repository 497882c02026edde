//! The joined history+visit row that makes up the analysis dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{host_of, shorten};
use crate::models::{HistoryEntry, TransitionType, VisitEntry};
use crate::utils::time::{date_stamp, LocalZone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub visit_id: String,
    pub referring_visit_id: Option<String>,
    pub url: String,
    pub title: String,
    pub domain: String,
    pub short_domain: String,
    /// Epoch ms; the dataset is ordered by this field.
    pub visit_time: i64,
    pub visit_count: u32,
    pub typed_count: u32,
    pub transition_type: TransitionType,
    /// Local calendar day of `visit_time`.
    #[serde(skip)]
    pub date: NaiveDate,
    pub date_stamp: String,

    // Filled in by the derive pass once the dataset is sorted.
    /// Hours until the next visit in the dataset, capped.
    pub dwell_time: f64,
    pub visit_time_end: i64,
    pub visit_start_time: String,
    pub visit_end_time: String,
    pub visit_start_time_stamp: String,
    pub visit_end_time_stamp: String,
}

impl VisitRecord {
    /// Merge a history entry with one of its visits.
    pub fn join(history: &HistoryEntry, visit: &VisitEntry, zone: LocalZone) -> Self {
        let domain = host_of(&history.url);
        let short_domain = shorten(&domain);
        let date = zone.date_of(visit.visit_time);

        Self {
            visit_id: visit.visit_id.clone(),
            referring_visit_id: visit.referring_visit_id.clone(),
            url: history.url.clone(),
            title: history.title.clone(),
            domain,
            short_domain,
            visit_time: visit.visit_time,
            visit_count: history.visit_count,
            typed_count: history.typed_count,
            transition_type: visit.transition_type,
            date,
            date_stamp: date_stamp(date),
            dwell_time: 0.0,
            visit_time_end: visit.visit_time,
            visit_start_time: String::new(),
            visit_end_time: String::new(),
            visit_start_time_stamp: String::new(),
            visit_end_time_stamp: String::new(),
        }
    }
}
