use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AnalyticsConfig,
    dataset::Dataset,
    ingest::{self, RefreshStats},
    provider::HistoryProvider,
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Gap added past the newest known visit so an incremental refresh does not
/// fetch it a second time.
const REFRESH_OVERLAP_GUARD_MS: i64 = 100;

/// One analysis session: a provider, the dataset built from it and the limits
/// every aggregate reads.
#[derive(Clone)]
pub struct HistoryAnalyzer {
    provider: Arc<dyn HistoryProvider>,
    dataset: Arc<Mutex<Dataset>>,
    config: Arc<AnalyticsConfig>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl HistoryAnalyzer {
    /// Fails when `config` doesn't pass [`AnalyticsConfig::validate`].
    pub fn new(provider: Arc<dyn HistoryProvider>, config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            dataset: Arc::new(Mutex::new(Dataset::new())),
            config: Arc::new(config),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Rebuild the dataset from the whole lookback window. The previous
    /// dataset is kept if the fetch fails.
    pub async fn initialize(&self, now_ms: i64) -> Result<RefreshStats> {
        let since = self.config.streamgraph_start(now_ms);
        let mut dataset = self.dataset.lock().await;
        let mut fresh = Dataset::new();
        let stats = self.run_refresh(&mut fresh, since).await?;
        *dataset = fresh;
        Ok(stats)
    }

    /// Fetch only what was visited after the newest record already held.
    pub async fn refresh_since_last(&self, now_ms: i64) -> Result<RefreshStats> {
        let mut dataset = self.dataset.lock().await;
        let since = match dataset.end_time() {
            Some(end) => end + REFRESH_OVERLAP_GUARD_MS,
            None => self.config.streamgraph_start(now_ms),
        };
        self.run_refresh(&mut dataset, since).await
    }

    /// Abort any refresh in flight. Later refreshes run normally.
    pub async fn cancel(&self) {
        let mut token = self.cancel.lock().await;
        token.cancel();
        *token = CancellationToken::new();
        log_info!("history refresh cancelled");
    }

    /// Run `f` against the current dataset.
    pub async fn with_dataset<T>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        let dataset = self.dataset.lock().await;
        f(&dataset)
    }

    /// Refresh, logging instead of failing so callers still get the data
    /// held from the last successful refresh.
    pub(crate) async fn refresh_or_keep_stale(&self, now_ms: i64) {
        if let Err(err) = self.refresh_since_last(now_ms).await {
            log_warn!("refresh failed, serving previous data: {err:#}");
        }
    }

    async fn run_refresh(&self, dataset: &mut Dataset, since: i64) -> Result<RefreshStats> {
        let token = self.cancel.lock().await.clone();
        ingest::refresh(
            Arc::clone(&self.provider),
            dataset,
            since,
            &self.config,
            &token,
        )
        .await
    }
}
