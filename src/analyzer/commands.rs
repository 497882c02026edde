//! Named request dispatch.
//!
//! Every request refreshes the dataset first, then runs one aggregate builder
//! over it.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    self, ActiveTraceResult, StreamgraphResult, TimeOfDayResult, TopVisitsResult, WordCloudResult,
};

use super::HistoryAnalyzer;

const ENABLE_LOGS: bool = true;

use crate::log_debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    DwellByDay,
    VisitsByDay,
    ActiveTrace,
    TimeOfDay,
    WordCloud,
    TopVisits,
}

impl RequestKind {
    pub const ALL: [RequestKind; 6] = [
        RequestKind::DwellByDay,
        RequestKind::VisitsByDay,
        RequestKind::ActiveTrace,
        RequestKind::TimeOfDay,
        RequestKind::WordCloud,
        RequestKind::TopVisits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::DwellByDay => "dwell-by-day",
            RequestKind::VisitsByDay => "visits-by-day",
            RequestKind::ActiveTrace => "active-trace",
            RequestKind::TimeOfDay => "time-of-day",
            RequestKind::WordCloud => "word-cloud",
            RequestKind::TopVisits => "top-visits",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| anyhow!("unknown request `{name}`"))
    }
}

/// Result of one request; serializes as the bare aggregate shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Streamgraph(StreamgraphResult),
    ActiveTrace(ActiveTraceResult),
    TimeOfDay(TimeOfDayResult),
    WordCloud(WordCloudResult),
    TopVisits(TopVisitsResult),
}

impl HistoryAnalyzer {
    /// Refresh since the last fetch, then build the requested aggregate.
    /// A failed refresh is logged and the previous data is used.
    pub async fn handle(&self, kind: RequestKind, now_ms: i64) -> Response {
        self.refresh_or_keep_stale(now_ms).await;

        let config = self.config();
        log_debug!("building {kind}");
        self.with_dataset(|dataset| match kind {
            RequestKind::DwellByDay => {
                Response::Streamgraph(aggregate::dwell_by_domain_day(dataset, config, now_ms))
            }
            RequestKind::VisitsByDay => {
                Response::Streamgraph(aggregate::visits_by_domain_day(dataset, config, now_ms))
            }
            RequestKind::ActiveTrace => {
                Response::ActiveTrace(aggregate::active_trace(dataset, config, now_ms))
            }
            RequestKind::TimeOfDay => Response::TimeOfDay(aggregate::time_of_day(dataset, config)),
            RequestKind::WordCloud => {
                Response::WordCloud(aggregate::word_cloud(dataset, config, now_ms))
            }
            RequestKind::TopVisits => {
                Response::TopVisits(aggregate::top_visits(dataset, config, now_ms))
            }
        })
        .await
    }

    pub async fn handle_named(&self, name: &str, now_ms: i64) -> Result<Response> {
        let kind: RequestKind = name.parse()?;
        Ok(self.handle(kind, now_ms).await)
    }
}
