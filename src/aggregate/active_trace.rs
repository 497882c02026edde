//! Gantt-style session timeline for the busiest domains of the recent window.

use std::collections::HashMap;

use crate::{config::AnalyticsConfig, dataset::Dataset, models::VisitRecord};

use super::{
    ranking::{rank_by, Measure},
    types::{ActiveTraceResult, LaneSpan, TraceSpan},
};

pub fn active_trace(dataset: &Dataset, config: &AnalyticsConfig, now_ms: i64) -> ActiveTraceResult {
    let start = config.active_trace_start(now_ms);
    let min_window = config.active_trace_min_window_hours;
    let eligible: Vec<&VisitRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.dwell_time > min_window && r.visit_time > start)
        .collect();

    let ranked = rank_by(
        eligible.iter().copied(),
        |r| r.domain.as_str(),
        Measure::DwellHours,
        config.active_trace_max_domains,
    );
    let rank_of: HashMap<&str, usize> = ranked.iter().map(|r| (r.key.as_str(), r.rank)).collect();

    let traced: Vec<(&VisitRecord, usize)> = eligible
        .into_iter()
        .filter_map(|r| rank_of.get(r.domain.as_str()).map(|&rank| (r, rank)))
        .collect();
    let limit = config.active_trace_max_items;

    let mut hourdata: Vec<TraceSpan> = traced
        .iter()
        .map(|(r, _)| TraceSpan {
            domain_name: r.domain.clone(),
            start: r.visit_start_time.clone(),
            end: r.visit_end_time.clone(),
        })
        .collect();
    hourdata.sort_by(|a, b| a.start.cmp(&b.start));
    hourdata.truncate(limit);

    let timestampdata = traced
        .iter()
        .take(limit)
        .map(|(r, _)| TraceSpan {
            domain_name: r.domain.clone(),
            start: r.visit_start_time_stamp.clone(),
            end: r.visit_end_time_stamp.clone(),
        })
        .collect();

    let chrometimedata = traced
        .iter()
        .take(limit)
        .map(|(r, rank)| LaneSpan {
            domain_name: r.domain.clone(),
            lane: rank - 1,
            start: r.visit_time,
            end: r.visit_time_end,
        })
        .collect();

    ActiveTraceResult {
        hourdata,
        timestampdata,
        chrometimedata,
    }
}
