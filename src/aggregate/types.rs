use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time::date_stamp_format;

/// One `(rank, domain, date)` point of a daily streamgraph series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeriesPoint {
    pub rank: usize,
    pub key: String,
    #[serde(with = "date_stamp_format")]
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamgraphResult {
    pub series: Vec<DailySeriesPoint>,
    pub num_days: u32,
    pub max_domains: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub timeindex: usize,
    pub rate: u64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// 1 = Monday .. 7 = Sunday
    pub day: u32,
    /// 1..=24, hour of day plus one
    pub hour: u32,
    pub rate: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayResult {
    pub time_slot: Vec<TimeSlot>,
    pub heatmap: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudEntry {
    pub text: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudResult {
    pub word_list: Vec<WordCloudEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVisitEntry {
    pub domain: String,
    pub visits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVisitsResult {
    pub history: Vec<TopVisitEntry>,
}

/// A session on the active trace, with either clock or date-time bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSpan {
    pub domain_name: String,
    pub start: String,
    pub end: String,
}

/// A session placed on its domain's lane, bounds in epoch ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneSpan {
    pub domain_name: String,
    pub lane: usize,
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTraceResult {
    pub hourdata: Vec<TraceSpan>,
    pub timestampdata: Vec<TraceSpan>,
    pub chrometimedata: Vec<LaneSpan>,
}
