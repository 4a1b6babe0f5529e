//! In-memory backend: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use topicwise_core::error::HistoryError;
use topicwise_core::history::{HistoryQuery, HistoryRecord, HistoryStore};

/// A history store that keeps records in a Vec.
/// Useful for testing and for runs where persistence isn't needed.
pub struct InMemoryHistory {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Start with an existing set of records.
    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Records of `scope`, newest first, at most `limit`.
///
/// Records with equal timestamps come out most-recently-appended first.
pub(crate) fn newest_first(records: &[HistoryRecord], scope: &str, limit: usize) -> Vec<HistoryRecord> {
    let mut matching: Vec<HistoryRecord> = records
        .iter()
        .rev()
        .filter(|r| r.scope == scope)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching.truncate(limit);
    matching
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    fn name(&self) -> &str { "in_memory" }

    async fn append(&self, records: Vec<HistoryRecord>) -> Result<usize, HistoryError> {
        let n = records.len();
        self.records.write().await.extend(records);
        Ok(n)
    }

    async fn recent(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>, HistoryError> {
        let records = self.records.read().await;
        Ok(newest_first(&records, &query.scope, query.limit))
    }

    async fn count(&self, scope: &str) -> Result<usize, HistoryError> {
        Ok(self.records.read().await.iter().filter(|r| r.scope == scope).count())
    }

    async fn clear(&self, scope: &str) -> Result<usize, HistoryError> {
        let mut records = self.records.write().await;
        let len_before = records.len();
        records.retain(|r| r.scope != scope);
        Ok(len_before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn append_and_read_newest_first() {
        let store = InMemoryHistory::new();
        store
            .append(vec![
                HistoryRecord::new("p1", "Asma", "s1", at(1)),
                HistoryRecord::new("p1", "DPOC", "s1", at(3)),
                HistoryRecord::new("p1", "Gota", "s1", at(2)),
            ])
            .await
            .unwrap();

        let records = store.recent(HistoryQuery::new("p1", 10)).await.unwrap();
        let topics: Vec<&str> = records.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["DPOC", "Gota", "Asma"]);
    }

    #[tokio::test]
    async fn limit_and_scope_are_respected() {
        let store = InMemoryHistory::with_records(vec![
            HistoryRecord::new("p1", "Asma", "s1", at(1)),
            HistoryRecord::new("p2", "DPOC", "s2", at(2)),
            HistoryRecord::new("p1", "Gota", "s3", at(3)),
        ]);

        let records = store.recent(HistoryQuery::new("p1", 1)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Gota");
        assert_eq!(store.count("p2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_only_touches_scope() {
        let store = InMemoryHistory::with_records(vec![
            HistoryRecord::new("p1", "Asma", "s1", at(1)),
            HistoryRecord::new("p2", "DPOC", "s2", at(2)),
        ]);

        assert_eq!(store.clear("p1").await.unwrap(), 1);
        assert_eq!(store.count("p1").await.unwrap(), 0);
        assert_eq!(store.count("p2").await.unwrap(), 1);
    }
}
