//! Sources of browsing history.
//!
//! The pipeline only ever talks to a [`HistoryProvider`]: one `search` for the
//! URLs touched since a point in time, then one `get_visits` per URL.

pub mod chrome;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{HistoryEntry, SearchFilter, VisitEntry};

pub use chrome::ChromeHistoryDb;
pub use memory::MemoryProvider;

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// History entries matching `filter`, most recently visited first.
    async fn search(&self, filter: SearchFilter) -> Result<Vec<HistoryEntry>>;

    /// Every recorded visit to exactly `url`.
    async fn get_visits(&self, url: &str) -> Result<Vec<VisitEntry>>;
}
