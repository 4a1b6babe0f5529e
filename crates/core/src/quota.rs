//! Allocation output types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::topic::Topic;

/// How many times each topic appeared in the recent sessions of a scope.
///
/// An empty map means "no history", i.e. the first generation ever.
pub type TopicFrequencyMap = HashMap<Topic, usize>;

/// The number of items the generation step should produce for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaEntry {
    pub topic: Topic,
    pub quota: usize,
}

impl QuotaEntry {
    pub fn new(topic: impl Into<Topic>, quota: usize) -> Self {
        Self {
            topic: topic.into(),
            quota,
        }
    }
}

/// Sum of all quotas in a distribution.
pub fn total_quota(entries: &[QuotaEntry]) -> usize {
    entries.iter().map(|e| e.quota).sum()
}
