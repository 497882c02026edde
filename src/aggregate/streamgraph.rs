//! Per-domain daily series for the top domains, dwell hours or visit counts.

use indexmap::IndexMap;

use crate::{config::AnalyticsConfig, dataset::Dataset};

use super::{
    gaps::{fill_gaps, sum_by_rank_key_date},
    ranking::{rank_by, Measure},
    types::{DailySeriesPoint, StreamgraphResult},
};

pub fn dwell_by_domain_day(
    dataset: &Dataset,
    config: &AnalyticsConfig,
    now_ms: i64,
) -> StreamgraphResult {
    daily_series(dataset, config, now_ms, Measure::DwellHours)
}

pub fn visits_by_domain_day(
    dataset: &Dataset,
    config: &AnalyticsConfig,
    now_ms: i64,
) -> StreamgraphResult {
    daily_series(dataset, config, now_ms, Measure::VisitCount)
}

fn daily_series(
    dataset: &Dataset,
    config: &AnalyticsConfig,
    now_ms: i64,
    measure: Measure,
) -> StreamgraphResult {
    let mut result = StreamgraphResult {
        series: Vec::new(),
        num_days: config.streamgraph_lookback_days,
        max_domains: config.streamgraph_max_domains,
    };
    let (Some(first), Some(last)) = (dataset.start_time(), dataset.end_time()) else {
        return result;
    };

    let records = dataset.records();
    let ranked = rank_by(
        records,
        |r| r.domain.as_str(),
        measure,
        config.streamgraph_max_domains,
    );
    let rank_of: IndexMap<&str, usize> = ranked.iter().map(|r| (r.key.as_str(), r.rank)).collect();

    let mut points = Vec::new();
    for record in records {
        if let Some(&rank) = rank_of.get(record.domain.as_str()) {
            points.push(DailySeriesPoint {
                rank,
                key: record.domain.clone(),
                date: record.date,
                value: measure.of(record),
            });
        }
    }

    let fill_start = config.streamgraph_start(now_ms).max(first);
    let zone = config.zone();
    for entry in &ranked {
        fill_gaps(&mut points, fill_start, last, &entry.key, entry.rank, zone);
    }

    result.series = sum_by_rank_key_date(points);
    result
}
