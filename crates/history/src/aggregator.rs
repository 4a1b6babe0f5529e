//! Session-window topic aggregation.
//!
//! Turns the flat generation history of a scope into a [`TopicFrequencyMap`]
//! restricted to the N most recent sessions. The map is rebuilt on every
//! call and never stored.

use std::sync::Arc;
use topicwise_core::history::{group_sessions, HistoryQuery, HistoryRecord, HistoryStore, Session};
use topicwise_core::quota::TopicFrequencyMap;
use topicwise_core::topic::FALLBACK_TOPIC;
use tracing::{debug, info, warn};

/// Default number of sessions that count as "recent".
pub const DEFAULT_LOOKBACK_SESSIONS: usize = 3;

/// Records fetched per lookback session. Assumes no session has more than
/// ~50 items; only bounds the read cost.
pub const DEFAULT_FETCH_MULTIPLIER: usize = 50;

/// Reads history from a store and counts topics over recent sessions.
pub struct HistoryAggregator {
    store: Arc<dyn HistoryStore>,
    fetch_multiplier: usize,
    fallback_topic: String,
}

impl HistoryAggregator {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            fetch_multiplier: DEFAULT_FETCH_MULTIPLIER,
            fallback_topic: FALLBACK_TOPIC.to_string(),
        }
    }

    /// Override the per-session read multiplier (minimum 1).
    pub fn with_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.fetch_multiplier = multiplier.max(1);
        self
    }

    /// Override the label counted for records without a topic.
    pub fn with_fallback_topic(mut self, topic: impl Into<String>) -> Self {
        self.fallback_topic = topic.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Topic counts over the `lookback` most recent sessions of `scope`.
    ///
    /// An empty map means there is no usable history. A failing store is
    /// logged and also yields an empty map, so a storage hiccup degrades to
    /// a cold-start allocation instead of blocking generation.
    pub async fn topic_frequencies(&self, scope: &str, lookback: usize) -> TopicFrequencyMap {
        if lookback == 0 {
            return TopicFrequencyMap::new();
        }

        let limit = lookback.saturating_mul(self.fetch_multiplier);
        let records = match self.store.recent(HistoryQuery::new(scope, limit)).await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    scope,
                    backend = self.store.name(),
                    error = %e,
                    "Failed to read topic history; treating as first generation"
                );
                return TopicFrequencyMap::new();
            }
        };

        if records.is_empty() {
            info!(scope, "No generation history found; first generation");
            return TopicFrequencyMap::new();
        }

        let sessions = most_recent_sessions(records, lookback);
        debug!(scope, sessions = sessions.len(), "Analyzing recent sessions");

        let counts = count_topics(&sessions, &self.fallback_topic);
        debug!(
            scope,
            topics = %format_counts(&counts),
            "Topic history"
        );
        counts
    }
}

/// Group records into sessions and keep the `n` most recent.
///
/// Sessions are ordered by their earliest record, newest first; ties are
/// broken by session id so the result does not depend on read order.
pub fn most_recent_sessions(records: Vec<HistoryRecord>, n: usize) -> Vec<Session> {
    let mut sessions = group_sessions(records);
    sessions.sort_by(|a, b| {
        b.started_at
            .cmp(&a.started_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    sessions.truncate(n);
    sessions
}

/// Count every record's topic once. Blank topics count as `fallback`.
pub fn count_topics(sessions: &[Session], fallback: &str) -> TopicFrequencyMap {
    let mut counts = TopicFrequencyMap::new();
    for record in sessions.iter().flat_map(|s| s.records.iter()) {
        let topic = record.topic.trim();
        let key = if topic.is_empty() { fallback } else { topic };
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}

fn format_counts(counts: &TopicFrequencyMap) -> String {
    let mut pairs: Vec<(&String, &usize)> = counts.iter().collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(t, c)| format!("{t}:{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
