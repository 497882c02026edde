//! Group-by-key ranking shared by the domain-ranked aggregates.
//!
//! Groups keep the order their key was first seen in, and the descending sort
//! is stable, so equal totals stay in scan order. No other tie-break applies.

use indexmap::IndexMap;

use crate::models::VisitRecord;

/// What a ranked group accumulates per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    DwellHours,
    VisitCount,
}

impl Measure {
    pub fn of(self, record: &VisitRecord) -> f64 {
        match self {
            Measure::DwellHours => record.dwell_time,
            Measure::VisitCount => 1.0,
        }
    }
}

/// A key with its total and 1-based rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub rank: usize,
    pub key: String,
    pub total: f64,
}

/// Sum `measure` per `key`, order descending by total, keep the first `limit`.
pub fn rank_by<'a, I, K>(records: I, key: K, measure: Measure, limit: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a VisitRecord>,
    K: Fn(&VisitRecord) -> &str,
{
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let slot = totals.entry(key(record).to_string()).or_insert(0.0);
        *slot += measure.of(record);
    }

    let mut groups: Vec<(String, f64)> = totals.into_iter().collect();
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(limit);

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (key, total))| Ranked {
            rank: index + 1,
            key,
            total,
        })
        .collect()
}
