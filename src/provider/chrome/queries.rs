use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Row};

use crate::models::{HistoryEntry, SearchFilter, TransitionType, VisitEntry};
use crate::provider::HistoryProvider;

use super::{
    helpers::{contains_pattern, epoch_ms_to_webkit, referrer_id, to_u32, webkit_to_epoch_ms},
    ChromeHistoryDb,
};

fn row_to_history_entry(row: &Row) -> Result<HistoryEntry> {
    let id: i64 = row.get("id")?;
    let title: Option<String> = row.get("title")?;
    let last_visit_time: i64 = row.get("last_visit_time")?;
    let visit_count: i64 = row.get("visit_count")?;
    let typed_count: i64 = row.get("typed_count")?;

    Ok(HistoryEntry {
        id: id.to_string(),
        url: row.get("url")?,
        title: title.unwrap_or_default(),
        last_visit_time: webkit_to_epoch_ms(last_visit_time),
        visit_count: to_u32(visit_count, "visit_count")?,
        typed_count: to_u32(typed_count, "typed_count")?,
    })
}

fn row_to_visit_entry(row: &Row) -> Result<VisitEntry> {
    let id: i64 = row.get("id")?;
    let visit_time: i64 = row.get("visit_time")?;
    let from_visit: Option<i64> = row.get("from_visit")?;
    let transition: i64 = row.get("transition")?;

    Ok(VisitEntry {
        visit_id: id.to_string(),
        visit_time: webkit_to_epoch_ms(visit_time),
        referring_visit_id: from_visit.and_then(referrer_id),
        transition_type: TransitionType::from_chrome_core(transition),
    })
}

#[async_trait]
impl HistoryProvider for ChromeHistoryDb {
    async fn search(&self, filter: SearchFilter) -> Result<Vec<HistoryEntry>> {
        let start = epoch_ms_to_webkit(filter.start_time.max(0));
        let pattern = contains_pattern(&filter.text);
        let limit = i64::try_from(filter.max_results).unwrap_or(i64::MAX);

        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, visit_count, typed_count, last_visit_time
                 FROM urls
                 WHERE last_visit_time >= ?1
                   AND (url LIKE ?2 ESCAPE '\\' OR COALESCE(title, '') LIKE ?2 ESCAPE '\\')
                 ORDER BY last_visit_time DESC
                 LIMIT ?3",
            )?;

            let mut rows = stmt.query(params![start, pattern, limit])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_history_entry(row).context("malformed urls row")?);
            }

            Ok(entries)
        })
        .await
    }

    async fn get_visits(&self, url: &str) -> Result<Vec<VisitEntry>> {
        let url = url.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT visits.id AS id, visits.visit_time AS visit_time,
                        visits.from_visit AS from_visit, visits.transition AS transition
                 FROM visits
                 JOIN urls ON urls.id = visits.url
                 WHERE urls.url = ?1
                 ORDER BY visits.visit_time ASC",
            )?;

            let mut rows = stmt.query(params![url])?;
            let mut visits = Vec::new();
            while let Some(row) = rows.next()? {
                visits.push(row_to_visit_entry(row).context("malformed visits row")?);
            }

            Ok(visits)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::chrome::test_support::create_fixture;

    const T0: i64 = 1_700_000_000_000;

    fn open_fixture(dir: &tempfile::TempDir) -> ChromeHistoryDb {
        let path = dir.path().join("History");
        create_fixture(
            &path,
            &[
                ("https://mail.google.com/mail/u/0/", "Inbox", &[T0, T0 + 60_000][..]),
                ("https://docs.rs/tokio", "tokio - Rust", &[T0 + 120_000][..]),
                ("https://old.example.com/", "Old", &[T0 - 86_400_000][..]),
            ],
        );
        ChromeHistoryDb::open(path).unwrap()
    }

    #[tokio::test]
    async fn search_returns_recent_entries_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_fixture(&dir);

        let entries = db
            .search(SearchFilter {
                text: String::new(),
                max_results: 100,
                start_time: T0,
            })
            .await
            .unwrap();

        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://docs.rs/tokio", "https://mail.google.com/mail/u/0/"]);
        assert_eq!(entries[1].last_visit_time, T0 + 60_000);
        assert_eq!(entries[1].visit_count, 2);
    }

    #[tokio::test]
    async fn search_text_matches_title() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_fixture(&dir);

        let entries = db
            .search(SearchFilter {
                text: "inbox".into(),
                max_results: 100,
                start_time: 0,
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Inbox");
    }

    #[tokio::test]
    async fn get_visits_converts_times_and_referrers() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_fixture(&dir);

        let visits = db.get_visits("https://mail.google.com/mail/u/0/").await.unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].visit_time, T0);
        assert_eq!(visits[1].visit_time, T0 + 60_000);
        assert_eq!(visits[0].referring_visit_id, None);
        assert_eq!(visits[0].transition_type, TransitionType::Link);

        assert!(db.get_visits("https://unknown.org/").await.unwrap().is_empty());
    }

    #[test]
    fn open_rejects_non_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Other");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t (x INTEGER);")
            .unwrap();

        assert!(ChromeHistoryDb::open(path).is_err());
    }
}
