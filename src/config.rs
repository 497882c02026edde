use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::time::{LocalZone, MS_PER_DAY};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Largest fixed UTC offset accepted, just under a full day either way.
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Tunable limits for ingest and every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    /// Cap on history entries returned by a single provider search
    pub max_history_items_per_fetch: usize,

    pub top_visits_max_domains: usize,
    pub word_cloud_max_words: usize,

    /// Width of one time-of-day bucket; must divide a day evenly
    pub time_of_day_interval_minutes: u32,

    /// Trailing window for the daily series, word cloud and top visits (0 = all history)
    pub streamgraph_lookback_days: u32,
    pub streamgraph_max_domains: usize,

    /// Longest gap between visits still counted as time on the earlier page
    pub max_dwell_hours: f64,

    /// Active trace window and limits
    pub active_trace_lookback_days: u32,
    pub active_trace_max_domains: usize,
    pub active_trace_max_items: usize,
    pub active_trace_min_window_hours: f64,
    pub active_trace_since_midnight: bool,

    /// Visit lookups allowed in flight at once during a refresh
    pub lookup_concurrency: usize,

    /// Fixed UTC offset for calendar math; unset follows the system zone
    pub utc_offset_minutes: Option<i32>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_history_items_per_fetch: 100_000,
            top_visits_max_domains: 35,
            word_cloud_max_words: 30,
            time_of_day_interval_minutes: 15,
            streamgraph_lookback_days: 30,
            streamgraph_max_domains: 100,
            max_dwell_hours: 4.0,
            active_trace_lookback_days: 1,
            active_trace_max_domains: 100,
            active_trace_max_items: 100_000,
            active_trace_min_window_hours: 0.017,
            active_trace_since_midnight: true,
            lookup_concurrency: 64,
            utc_offset_minutes: None,
        }
    }
}

impl AnalyticsConfig {
    /// Read settings from a JSON file, or use defaults when it doesn't exist.
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let interval = self.time_of_day_interval_minutes;
        if interval == 0 || MINUTES_PER_DAY % interval != 0 {
            bail!("timeOfDayIntervalMinutes must divide {MINUTES_PER_DAY}, got {interval}");
        }
        if self.top_visits_max_domains == 0
            || self.word_cloud_max_words == 0
            || self.streamgraph_max_domains == 0
            || self.active_trace_max_domains == 0
        {
            bail!("domain and word limits must be at least 1");
        }
        if !(self.max_dwell_hours > 0.0) {
            bail!("maxDwellHours must be positive, got {}", self.max_dwell_hours);
        }
        if self.lookup_concurrency == 0 {
            bail!("lookupConcurrency must be at least 1");
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
                bail!(
                    "utcOffsetMinutes must be within ±{MAX_UTC_OFFSET_MINUTES}, got {minutes}"
                );
            }
        }
        Ok(())
    }

    pub fn zone(&self) -> LocalZone {
        match self.utc_offset_minutes {
            Some(minutes) => LocalZone::fixed_minutes(minutes),
            None => LocalZone::system(),
        }
    }

    /// Lower bound of the streamgraph, word cloud and top-visits window,
    /// or 0 when unbounded.
    pub fn streamgraph_start(&self, now_ms: i64) -> i64 {
        match self.streamgraph_lookback_days {
            0 => 0,
            days => now_ms - i64::from(days) * MS_PER_DAY,
        }
    }

    /// Lower bound of the active trace. Counts whole local days back from
    /// midnight unless `active_trace_since_midnight` is off.
    pub fn active_trace_start(&self, now_ms: i64) -> i64 {
        match self.active_trace_lookback_days {
            0 => 0,
            days if self.active_trace_since_midnight => {
                self.zone().midnight_days_before(now_ms, days - 1)
            }
            days => now_ms - i64::from(days) * MS_PER_DAY,
        }
    }

    /// Number of buckets in the time-of-day histogram.
    pub fn time_slots(&self) -> usize {
        (MINUTES_PER_DAY / self.time_of_day_interval_minutes.max(1)) as usize
    }
}
