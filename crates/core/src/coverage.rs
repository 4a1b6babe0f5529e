//! Coverage report produced by reconciling source topics with the labels of
//! generated items.

use serde::{Deserialize, Serialize};
use crate::topic::Topic;

/// Which source topics have been addressed by generated items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Source topics matched by at least one generated topic
    pub covered: Vec<Topic>,

    /// Source topics nothing matched
    pub uncovered: Vec<Topic>,

    /// `covered / source`; `None` when there were no source topics
    pub coverage_ratio: Option<f64>,
}

impl CoverageReport {
    /// Total number of distinct source topics considered.
    pub fn source_count(&self) -> usize {
        self.covered.len() + self.uncovered.len()
    }

    /// True when every source topic is covered (and there was at least one).
    pub fn is_complete(&self) -> bool {
        self.coverage_ratio.is_some() && self.uncovered.is_empty()
    }

    /// Sessions still needed to cover the remaining topics.
    pub fn estimate_remaining_sessions(&self, topics_per_session: usize) -> usize {
        estimate_sessions_for_full_coverage(self.uncovered.len(), topics_per_session)
    }
}

/// `ceil(uncovered / topics_per_session)`.
///
/// A deterministic projection assuming each future session addresses
/// `topics_per_session` new topics. A zero rate is treated as one topic per
/// session.
pub fn estimate_sessions_for_full_coverage(uncovered: usize, topics_per_session: usize) -> usize {
    uncovered.div_ceil(topics_per_session.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_sessions_for_full_coverage(0, 20), 0);
        assert_eq!(estimate_sessions_for_full_coverage(1, 20), 1);
        assert_eq!(estimate_sessions_for_full_coverage(20, 20), 1);
        assert_eq!(estimate_sessions_for_full_coverage(21, 20), 2);
    }

    #[test]
    fn zero_rate_counts_one_per_session() {
        assert_eq!(estimate_sessions_for_full_coverage(5, 0), 5);
    }

    #[test]
    fn empty_report_is_not_complete() {
        let report = CoverageReport {
            covered: vec![],
            uncovered: vec![],
            coverage_ratio: None,
        };
        assert!(!report.is_complete());
        assert_eq!(report.source_count(), 0);
        assert_eq!(report.estimate_remaining_sessions(3), 0);
    }
}
