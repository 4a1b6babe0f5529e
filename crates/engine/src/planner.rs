//! Batch planning.
//!
//! [`BatchPlanner`] is the one async entry point of the engine: it reads the
//! recent history of a scope, picks a batch size and allocates it across the
//! topic vocabulary. It also writes generated batches back as new sessions.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use topicwise_config::EngineConfig;
use topicwise_core::error::{AllocationError, HistoryError};
use topicwise_core::history::{HistoryRecord, HistoryStore};
use topicwise_core::quota::QuotaEntry;
use topicwise_core::topic::Topic;
use topicwise_history::aggregator::{HistoryAggregator, DEFAULT_LOOKBACK_SESSIONS};
use tracing::info;

use crate::allocator::{allocate, uncovered_by_history};
use crate::policy::{ClampedTopicCount, QuestionCountPolicy};

/// Everything the generation step needs for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPlan {
    pub scope: String,

    /// Batch size chosen by the policy
    pub total: usize,

    /// Why the policy chose `total`
    pub reason: String,

    /// Items per topic; sums to `total`
    pub quotas: Vec<QuotaEntry>,

    /// Topic counts over the recent sessions the plan was based on
    pub history: BTreeMap<Topic, usize>,

    /// Vocabulary topics absent from recent history
    pub uncovered: Vec<Topic>,
}

impl BatchPlan {
    /// True when the plan was made without any usable history.
    pub fn is_cold_start(&self) -> bool {
        self.history.is_empty()
    }
}

pub struct BatchPlanner {
    aggregator: HistoryAggregator,
    policy: Box<dyn QuestionCountPolicy>,
    lookback: usize,
}

impl BatchPlanner {
    pub fn new(aggregator: HistoryAggregator) -> Self {
        Self {
            aggregator,
            policy: Box::new(ClampedTopicCount::default()),
            lookback: DEFAULT_LOOKBACK_SESSIONS,
        }
    }

    /// A planner over `store` with the lookback, fetch bound, fallback label
    /// and batch bounds from `config`.
    pub fn from_config(store: Arc<dyn HistoryStore>, config: &EngineConfig) -> Self {
        let aggregator = HistoryAggregator::new(store)
            .with_fetch_multiplier(config.history.fetch_multiplier)
            .with_fallback_topic(config.history.fallback_topic.clone());
        Self::new(aggregator)
            .with_policy(Box::new(ClampedTopicCount::from_config(&config.allocation)))
            .with_lookback(config.history.lookback_sessions)
    }

    pub fn with_policy(mut self, policy: Box<dyn QuestionCountPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_lookback(mut self, sessions: usize) -> Self {
        self.lookback = sessions;
        self
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Plan the next batch for `scope` over `topics`.
    ///
    /// `requested` is the user's batch size, if any; the policy decides how
    /// much of it to honour. History read failures degrade to a cold-start
    /// plan.
    ///
    /// # Errors
    /// [`AllocationError::NoTopics`] when `topics` is empty.
    pub async fn plan<T: AsRef<str>>(
        &self,
        scope: &str,
        topics: &[T],
        requested: Option<usize>,
    ) -> Result<BatchPlan, AllocationError> {
        let size = self.policy.count(topics.len(), requested);
        if topics.is_empty() {
            return Err(AllocationError::NoTopics { total: size.count });
        }

        let history = self.aggregator.topic_frequencies(scope, self.lookback).await;
        let quotas = allocate(topics, &history, size.count)?;
        let uncovered = uncovered_by_history(topics, &history);

        info!(
            scope,
            policy = self.policy.name(),
            total = size.count,
            topics = topics.len(),
            uncovered = uncovered.len(),
            cold_start = history.is_empty(),
            "Batch planned"
        );

        Ok(BatchPlan {
            scope: scope.to_string(),
            total: size.count,
            reason: size.reason,
            quotas,
            history: history.into_iter().collect(),
            uncovered,
        })
    }

    /// Store a generated batch as one session of `scope`.
    ///
    /// Every label becomes one record stamped with the current time. Returns
    /// the number of records written.
    pub async fn record<L: AsRef<str>>(
        &self,
        scope: &str,
        session_id: &str,
        labels: &[L],
    ) -> Result<usize, HistoryError> {
        let now = Utc::now();
        let records: Vec<HistoryRecord> = labels
            .iter()
            .map(|label| HistoryRecord::new(scope, label.as_ref().trim(), session_id, now))
            .collect();
        let written = self.aggregator.store().append(records).await?;
        info!(scope, session_id, written, "Batch recorded");
        Ok(written)
    }
}
