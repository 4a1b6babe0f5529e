//! Batch size policies.
//!
//! Decides how many items the next batch should contain before the
//! allocator splits that number across topics.

use serde::Serialize;
use topicwise_config::AllocationConfig;

/// A batch size together with a human-readable explanation, suitable for
/// logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionCount {
    pub count: usize,
    pub reason: String,
}

impl QuestionCount {
    fn new(count: usize, reason: impl Into<String>) -> Self {
        Self {
            count,
            reason: reason.into(),
        }
    }
}

/// Chooses a batch size from the topic count and an optional user request.
pub trait QuestionCountPolicy: Send + Sync {
    /// Policy name, for logs.
    fn name(&self) -> &str;

    fn count(&self, topic_count: usize, requested: Option<usize>) -> QuestionCount;
}

/// One item per topic, kept within `[min, max]`.
///
/// A user request wins but is clamped into the same bounds. A request of
/// zero counts as no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedTopicCount {
    pub min: usize,
    pub max: usize,
}

impl ClampedTopicCount {
    /// Bounds are swapped if given inverted.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_config(config: &AllocationConfig) -> Self {
        Self::new(config.min_items, config.max_items)
    }
}

impl Default for ClampedTopicCount {
    fn default() -> Self {
        Self::new(20, 40)
    }
}

impl QuestionCountPolicy for ClampedTopicCount {
    fn name(&self) -> &str {
        "clamped_topic_count"
    }

    fn count(&self, topic_count: usize, requested: Option<usize>) -> QuestionCount {
        if let Some(n) = requested.filter(|&n| n > 0) {
            let clamped = n.max(self.min).min(self.max);
            return QuestionCount::new(
                clamped,
                format!("requested {n} (adjusted to {clamped})"),
            );
        }

        if topic_count <= self.min {
            QuestionCount::new(
                self.min,
                format!("few topics ({topic_count}): using minimum of {}", self.min),
            )
        } else if topic_count <= self.max {
            QuestionCount::new(topic_count, format!("{topic_count} items, one per topic"))
        } else {
            QuestionCount::new(
                self.max,
                format!("many topics ({topic_count}): using maximum of {}", self.max),
            )
        }
    }
}

/// Always the same batch size, unless the user asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCount(pub usize);

impl QuestionCountPolicy for FixedCount {
    fn name(&self) -> &str {
        "fixed"
    }

    fn count(&self, _topic_count: usize, requested: Option<usize>) -> QuestionCount {
        match requested.filter(|&n| n > 0) {
            Some(n) => QuestionCount::new(n, format!("requested {n}")),
            None => QuestionCount::new(self.0, format!("fixed batch of {}", self.0)),
        }
    }
}
