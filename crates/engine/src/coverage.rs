//! Coverage gap analysis.
//!
//! Reconciles the topics extracted from source material with the topic
//! labels attached to generated items. Labels are produced independently on
//! both sides, so identity is decided by a [`TopicMatcher`], never by
//! string equality.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use topicwise_core::coverage::CoverageReport;
use topicwise_core::matcher::TopicMatcher;
use topicwise_core::topic::Topic;
use tracing::debug;

use crate::matcher::SubstringMatcher;

/// Runs coverage analysis with a configurable matching strategy.
#[derive(Clone)]
pub struct CoverageAnalyzer {
    matcher: Arc<dyn TopicMatcher>,
}

impl CoverageAnalyzer {
    pub fn new(matcher: Arc<dyn TopicMatcher>) -> Self {
        Self { matcher }
    }

    pub fn matcher_name(&self) -> &str {
        self.matcher.name()
    }

    /// Split `source` into covered and uncovered topics.
    ///
    /// Source order is kept and repeated source labels are reported once.
    /// Blank source labels are ignored. The ratio is `None` when no source
    /// topic remains.
    pub fn analyze<S, G>(&self, source: &[S], generated: &[G]) -> CoverageReport
    where
        S: AsRef<str>,
        G: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut covered = Vec::new();
        let mut uncovered = Vec::new();

        for topic in source.iter().map(|t| t.as_ref().trim()) {
            if topic.is_empty() || !seen.insert(topic) {
                continue;
            }
            let hit = generated
                .iter()
                .any(|g| self.matcher.matches(topic, g.as_ref()));
            if hit {
                covered.push(topic.to_string());
            } else {
                uncovered.push(topic.to_string());
            }
        }

        let total = covered.len() + uncovered.len();
        let coverage_ratio = (total > 0).then(|| covered.len() as f64 / total as f64);

        debug!(
            matcher = self.matcher.name(),
            source = total,
            generated = generated.len(),
            covered = covered.len(),
            "Coverage analyzed"
        );

        CoverageReport {
            covered,
            uncovered,
            coverage_ratio,
        }
    }
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(SubstringMatcher))
    }
}

impl std::fmt::Debug for CoverageAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageAnalyzer")
            .field("matcher", &self.matcher.name())
            .finish()
    }
}

/// [`CoverageAnalyzer::analyze`] with the default [`SubstringMatcher`].
pub fn analyze<S: AsRef<str>, G: AsRef<str>>(source: &[S], generated: &[G]) -> CoverageReport {
    CoverageAnalyzer::default().analyze(source, generated)
}

/// Count generated items per topic label.
///
/// Labels are trimmed; blank ones are counted under `fallback`. Output is
/// in order of first appearance.
pub fn tally_topics<G: AsRef<str>>(labels: &[G], fallback: &str) -> Vec<(Topic, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(Topic, usize)> = Vec::new();

    for label in labels {
        let label = match label.as_ref().trim() {
            "" => fallback,
            l => l,
        };
        match index.get(label) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(label, out.len());
                out.push((label.to_string(), 1));
            }
        }
    }
    out
}
