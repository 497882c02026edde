//! History ingest: one provider search, then a bounded fan-out of visit
//! lookups joined back into dataset records.
//!
//! Lookups complete in any order. Records are staged until every lookup has
//! returned and only then handed to the dataset, which sorts and recomputes
//! derived fields. Any failure or cancellation drops the staged records, so
//! the dataset stays at its last complete state.

pub mod stats;

use std::{sync::Arc, time::Instant};

use anyhow::{anyhow, bail, Context, Result};
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AnalyticsConfig,
    dataset::Dataset,
    domain::is_displayable,
    models::{HistoryEntry, SearchFilter, VisitEntry, VisitRecord},
    provider::HistoryProvider,
    utils::time::LocalZone,
};

pub use stats::RefreshStats;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Join a visit to its history entry, keeping it only when its short domain
/// is displayable and it happened at or after `since`.
pub fn join_record(
    history: &HistoryEntry,
    visit: &VisitEntry,
    since: i64,
    zone: LocalZone,
) -> Option<VisitRecord> {
    if visit.visit_time < since {
        return None;
    }
    let record = VisitRecord::join(history, visit, zone);
    is_displayable(&record.short_domain).then_some(record)
}

/// Fetch everything visited since `since` and append it to `dataset`.
pub async fn refresh(
    provider: Arc<dyn HistoryProvider>,
    dataset: &mut Dataset,
    since: i64,
    config: &AnalyticsConfig,
    cancel: &CancellationToken,
) -> Result<RefreshStats> {
    let started = Instant::now();
    let zone = config.zone();
    let mut stats = RefreshStats::default();

    log_info!("refreshing history since {since}");

    let filter = SearchFilter {
        text: String::new(),
        max_results: config.max_history_items_per_fetch,
        start_time: since,
    };
    let entries = tokio::select! {
        _ = cancel.cancelled() => bail!("refresh cancelled"),
        result = provider.search(filter) => result.context("history search failed")?,
    };
    stats.history_items = entries.len();
    log_debug!("{} history items to look up", entries.len());

    let permits = Arc::new(Semaphore::new(config.lookup_concurrency.max(1)));
    let mut lookups = JoinSet::new();
    for entry in entries {
        let provider = Arc::clone(&provider);
        let permits = Arc::clone(&permits);
        lookups.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| anyhow!("lookup limiter closed"))?;
            let visits = provider
                .get_visits(&entry.url)
                .await
                .with_context(|| format!("visit lookup failed for {}", entry.url))?;
            Ok::<_, anyhow::Error>((entry, visits))
        });
    }

    let mut staged = Vec::new();
    loop {
        let joined = tokio::select! {
            _ = cancel.cancelled() => {
                lookups.abort_all();
                log_warn!("refresh cancelled with {} lookups outstanding", lookups.len());
                bail!("refresh cancelled");
            }
            joined = lookups.join_next() => joined,
        };

        let Some(joined) = joined else {
            break;
        };

        let (entry, visits) = match joined.context("visit lookup task panicked").and_then(|r| r) {
            Ok(lookup) => lookup,
            Err(err) => {
                lookups.abort_all();
                return Err(err);
            }
        };

        for visit in &visits {
            let record = join_record(&entry, visit, since, zone);
            stats.record(record.is_some());
            staged.extend(record);
        }
    }

    dataset.extend_and_recompute(staged, config.max_dwell_hours, zone);
    stats.elapsed_ms = started.elapsed().as_millis() as u64;

    log_info!(
        "refresh done: {} items, {} visits, {} accepted, {} rejected in {} ms",
        stats.history_items,
        stats.visits_seen,
        stats.accepted,
        stats.rejected,
        stats.elapsed_ms
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::models::TransitionType;
    use crate::provider::MemoryProvider;

    fn visit(id: &str, visit_time: i64) -> VisitEntry {
        VisitEntry {
            visit_id: id.to_string(),
            visit_time,
            referring_visit_id: None,
            transition_type: TransitionType::Link,
        }
    }

    fn config() -> AnalyticsConfig {
        AnalyticsConfig {
            utc_offset_minutes: Some(0),
            ..AnalyticsConfig::default()
        }
    }

    /// Answers lookups for earlier URLs more slowly so they finish out of order.
    struct SlowProvider {
        inner: MemoryProvider,
    }

    #[async_trait]
    impl HistoryProvider for SlowProvider {
        async fn search(&self, filter: SearchFilter) -> Result<Vec<HistoryEntry>> {
            self.inner.search(filter).await
        }

        async fn get_visits(&self, url: &str) -> Result<Vec<VisitEntry>> {
            let delay = if url.contains("a.com") { 30 } else { 1 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.get_visits(url).await
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl HistoryProvider for FailingProvider {
        async fn search(&self, _filter: SearchFilter) -> Result<Vec<HistoryEntry>> {
            Ok(vec![HistoryEntry {
                url: "https://a.com/".into(),
                ..HistoryEntry::default()
            }])
        }

        async fn get_visits(&self, _url: &str) -> Result<Vec<VisitEntry>> {
            bail!("profile locked")
        }
    }

    struct StalledProvider;

    #[async_trait]
    impl HistoryProvider for StalledProvider {
        async fn search(&self, _filter: SearchFilter) -> Result<Vec<HistoryEntry>> {
            Ok(vec![HistoryEntry {
                url: "https://a.com/".into(),
                ..HistoryEntry::default()
            }])
        }

        async fn get_visits(&self, _url: &str) -> Result<Vec<VisitEntry>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn out_of_order_lookups_end_up_sorted() {
        let mut inner = MemoryProvider::new();
        inner.push_visit("https://a.com/", visit("1", 1_000));
        inner.push_visit("https://a.com/", visit("3", 5_000));
        inner.push_visit("https://b.com/", visit("2", 3_000));
        let provider: Arc<dyn HistoryProvider> = Arc::new(SlowProvider { inner });

        let mut dataset = Dataset::new();
        let stats = refresh(provider, &mut dataset, 0, &config(), &CancellationToken::new())
            .await
            .unwrap();

        let times: Vec<i64> = dataset.records().iter().map(|r| r.visit_time).collect();
        assert_eq!(times, vec![1_000, 3_000, 5_000]);
        assert_eq!(stats.history_items, 2);
        assert_eq!(stats.accepted, 3);
        assert_eq!(dataset.records()[2].dwell_time, 0.0);
    }

    #[tokio::test]
    async fn rejects_long_domains_and_early_visits() {
        let long_url = format!("https://{}.org/", "x".repeat(31));
        let mut inner = MemoryProvider::new();
        inner.push_visit(&long_url, visit("1", 2_000));
        inner.push_visit("https://b.com/", visit("2", 500));
        inner.push_visit("https://b.com/", visit("3", 2_500));
        inner.push_visit("not a url", visit("4", 2_600));
        let provider: Arc<dyn HistoryProvider> = Arc::new(inner);

        let mut dataset = Dataset::new();
        let stats = refresh(provider, &mut dataset, 1_000, &config(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(stats.visits_seen, 4);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 3);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].short_domain, "b");
    }

    #[tokio::test]
    async fn failed_lookup_leaves_dataset_untouched() {
        let mut dataset = Dataset::from_records(
            vec![crate::dataset::test_support::record("https://c.com/", 10)],
            4.0,
            LocalZone::utc(),
        );
        let before = dataset.clone();

        let provider: Arc<dyn HistoryProvider> = Arc::new(FailingProvider);
        let err = refresh(provider, &mut dataset, 0, &config(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("profile locked"));
        assert_eq!(dataset.records(), before.records());
    }

    #[tokio::test]
    async fn cancellation_stops_a_stalled_refresh() {
        let provider: Arc<dyn HistoryProvider> = Arc::new(StalledProvider);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let mut dataset = Dataset::new();
        let result = refresh(provider, &mut dataset, 0, &config(), &cancel).await;

        assert!(result.is_err());
        assert!(dataset.is_empty());
    }
}
