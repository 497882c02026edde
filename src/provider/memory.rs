use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{HistoryEntry, SearchFilter, VisitEntry};

use super::HistoryProvider;

/// One URL and its visits, as stored in a JSON history export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub history: HistoryEntry,
    #[serde(default)]
    pub visits: Vec<VisitEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryExport {
    entries: Vec<ExportedEntry>,
}

/// Provider backed by an in-memory list, either built in code or loaded from
/// a JSON export of the shape `{"entries": [{"history": {..}, "visits": [..]}]}`.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    entries: Vec<ExportedEntry>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history export from {}", path.display()))?;
        let export: HistoryExport = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history export {}", path.display()))?;
        Ok(Self {
            entries: export.entries,
        })
    }

    /// Add a visit, creating the URL's history entry on first sight.
    ///
    /// `last_visit_time` and `visit_count` track the visits pushed so far.
    pub fn push_visit(&mut self, url: &str, visit: VisitEntry) {
        let position = self.entries.iter().position(|e| e.history.url == url);
        let entry = match position {
            Some(index) => &mut self.entries[index],
            None => {
                self.entries.push(ExportedEntry {
                    history: HistoryEntry {
                        id: self.entries.len().to_string(),
                        url: url.to_string(),
                        title: String::new(),
                        last_visit_time: visit.visit_time,
                        visit_count: 0,
                        typed_count: 0,
                    },
                    visits: Vec::new(),
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        };

        entry.history.last_visit_time = entry.history.last_visit_time.max(visit.visit_time);
        entry.history.visit_count += 1;
        entry.visits.push(visit);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl HistoryProvider for MemoryProvider {
    async fn search(&self, filter: SearchFilter) -> Result<Vec<HistoryEntry>> {
        let needle = filter.text.to_lowercase();
        let mut matches: Vec<HistoryEntry> = self
            .entries
            .iter()
            .map(|e| &e.history)
            .filter(|h| h.last_visit_time >= filter.start_time)
            .filter(|h| {
                needle.is_empty()
                    || h.url.to_lowercase().contains(&needle)
                    || h.title.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
        matches.truncate(filter.max_results);
        Ok(matches)
    }

    async fn get_visits(&self, url: &str) -> Result<Vec<VisitEntry>> {
        self.entries
            .iter()
            .find(|e| e.history.url == url)
            .map(|e| e.visits.clone())
            .ok_or_else(|| anyhow!("no history entry for {url}"))
    }
}
