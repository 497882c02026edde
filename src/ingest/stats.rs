use serde::Serialize;

/// Counters for one refresh, logged when it completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStats {
    pub history_items: usize,
    pub visits_seen: usize,
    pub accepted: usize,
    /// Visits dropped for an unusable domain or a time before the fetch bound
    pub rejected: usize,
    pub elapsed_ms: u64,
}

impl RefreshStats {
    pub(crate) fn record(&mut self, accepted: bool) {
        self.visits_seen += 1;
        if accepted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }
}
