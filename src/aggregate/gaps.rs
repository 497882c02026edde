//! Zero-filling of daily series.
//!
//! Filling appends a zero point for every day in range without looking at the
//! points already present. [`sum_by_rank_key_date`] then folds the duplicates
//! away, which leaves exactly one point per `(rank, key, date)`.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::utils::time::{LocalZone, MS_PER_DAY};

use super::types::DailySeriesPoint;

/// Append `{date, key, value: 0, rank}` while stepping one calendar day at a
/// time from `start_ms`, as long as the step is no later than a day past
/// `end_ms`. The last date reached depends on the clock time of `start_ms`.
pub fn fill_gaps(
    series: &mut Vec<DailySeriesPoint>,
    start_ms: i64,
    end_ms: i64,
    key: &str,
    rank: usize,
    zone: LocalZone,
) {
    let limit = end_ms.saturating_add(MS_PER_DAY);
    let mut t = start_ms;

    while t <= limit {
        series.push(DailySeriesPoint {
            rank,
            key: key.to_string(),
            date: zone.date_of(t),
            value: 0.0,
        });
        let next = zone.add_days(t, 1);
        if next <= t {
            break;
        }
        t = next;
    }
}

/// Sum values sharing `(rank, key, date)`, ordered by rank and then date.
pub fn sum_by_rank_key_date(points: Vec<DailySeriesPoint>) -> Vec<DailySeriesPoint> {
    let mut sums: IndexMap<(usize, String, NaiveDate), f64> = IndexMap::new();
    for point in points {
        *sums.entry((point.rank, point.key, point.date)).or_insert(0.0) += point.value;
    }

    let mut series: Vec<DailySeriesPoint> = sums
        .into_iter()
        .map(|((rank, key, date), value)| DailySeriesPoint {
            rank,
            key,
            date,
            value,
        })
        .collect();
    series.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.date.cmp(&b.date)));
    series
}
