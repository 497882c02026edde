//! Fields inferred from the gap between consecutive visits.
//!
//! Both passes assume `records` is sorted by `visit_time` and pair each record
//! with the one after it in the whole dataset, not the next visit to the same
//! domain.

use crate::models::VisitRecord;
use crate::utils::time::{time_of_day, time_stamp, LocalZone, MS_PER_HOUR};

/// Shown as the end of a session that runs past midnight.
const END_OF_DAY: &str = "23:59";

/// Rebuild every derived field from scratch.
pub fn recompute(records: &mut [VisitRecord], max_dwell_hours: f64, zone: LocalZone) {
    compute_dwell(records, max_dwell_hours);
    compute_session_bounds(records, zone);
}

/// Hours from each visit to the next, capped at `max_dwell_hours`.
/// The last record has nothing after it and gets zero.
pub fn compute_dwell(records: &mut [VisitRecord], max_dwell_hours: f64) {
    let Some(last) = records.len().checked_sub(1) else {
        return;
    };

    for i in 0..last {
        let next = records[i + 1].visit_time;
        let record = &mut records[i];
        let gap_hours = (next - record.visit_time) as f64 / MS_PER_HOUR as f64;
        record.dwell_time = gap_hours.min(max_dwell_hours);
        record.visit_time_end = next;
    }

    let record = &mut records[last];
    record.dwell_time = 0.0;
    record.visit_time_end = record.visit_time;
}

/// Clock strings for the span each visit covers.
///
/// A span whose end falls on a later calendar day keeps its real end stamp but
/// displays `23:59` as its end time, so a timeline never ends before it starts.
/// `dwell_time` is left untouched.
pub fn compute_session_bounds(records: &mut [VisitRecord], zone: LocalZone) {
    let Some(last) = records.len().checked_sub(1) else {
        return;
    };

    for i in 0..last {
        let start = zone.at(records[i].visit_time);
        let end = zone.at(records[i + 1].visit_time);
        let record = &mut records[i];

        record.visit_start_time = time_of_day(&start);
        record.visit_start_time_stamp = time_stamp(&start);
        record.visit_end_time_stamp = time_stamp(&end);
        record.visit_end_time = if start.date_naive() != end.date_naive() {
            END_OF_DAY.to_string()
        } else {
            time_of_day(&end)
        };
    }

    let record = &mut records[last];
    let moment = zone.at(record.visit_time);
    record.visit_start_time = time_of_day(&moment);
    record.visit_end_time = record.visit_start_time.clone();
    record.visit_start_time_stamp = time_stamp(&moment);
    record.visit_end_time_stamp = record.visit_start_time_stamp.clone();
}
