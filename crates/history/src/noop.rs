//! No-op history backend: disables history tracking entirely.
//!
//! Every allocation then behaves as a cold start.

use async_trait::async_trait;
use topicwise_core::error::HistoryError;
use topicwise_core::history::{HistoryQuery, HistoryRecord, HistoryStore};

/// A history store that keeps nothing.
pub struct NoopHistory;

#[async_trait]
impl HistoryStore for NoopHistory {
    fn name(&self) -> &str { "none" }

    async fn append(&self, _records: Vec<HistoryRecord>) -> Result<usize, HistoryError> {
        Ok(0)
    }

    async fn recent(&self, _query: HistoryQuery) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(Vec::new())
    }

    async fn count(&self, _scope: &str) -> Result<usize, HistoryError> {
        Ok(0)
    }

    async fn clear(&self, _scope: &str) -> Result<usize, HistoryError> {
        Ok(0)
    }
}
