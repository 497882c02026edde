//! Most-visited rankings over the lookback window.

use crate::{config::AnalyticsConfig, dataset::Dataset, models::VisitRecord};

use super::{
    ranking::{rank_by, Measure},
    types::{TopVisitEntry, TopVisitsResult, WordCloudEntry, WordCloudResult},
};

fn in_window<'a>(
    dataset: &'a Dataset,
    config: &AnalyticsConfig,
    now_ms: i64,
) -> impl Iterator<Item = &'a VisitRecord> {
    let start = config.streamgraph_start(now_ms);
    dataset.records().iter().filter(move |r| r.visit_time > start)
}

/// Visit counts per short domain.
pub fn word_cloud(dataset: &Dataset, config: &AnalyticsConfig, now_ms: i64) -> WordCloudResult {
    let word_list = rank_by(
        in_window(dataset, config, now_ms),
        |r| r.short_domain.as_str(),
        Measure::VisitCount,
        config.word_cloud_max_words,
    )
    .into_iter()
    .map(|ranked| WordCloudEntry {
        text: ranked.key,
        size: ranked.total as u64,
    })
    .collect();

    WordCloudResult { word_list }
}

/// Visit counts per full domain.
pub fn top_visits(dataset: &Dataset, config: &AnalyticsConfig, now_ms: i64) -> TopVisitsResult {
    let history = rank_by(
        in_window(dataset, config, now_ms),
        |r| r.domain.as_str(),
        Measure::VisitCount,
        config.top_visits_max_domains,
    )
    .into_iter()
    .map(|ranked| TopVisitEntry {
        domain: ranked.key,
        visits: ranked.total as u64,
    })
    .collect();

    TopVisitsResult { history }
}
