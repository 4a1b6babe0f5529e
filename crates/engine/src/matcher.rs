//! Default topic matching strategy.

use topicwise_core::matcher::TopicMatcher;

use crate::vocabulary::normalize_topic_name;

/// Case- and accent-insensitive, bidirectional substring containment.
///
/// `"hepatite"` matches `"Hepatite B"` and vice versa, and `"esofago"`
/// matches `"Esôfago de Barrett"`. Both sides go through
/// [`normalize_topic_name`] first. Labels that are blank after
/// normalization never match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TopicMatcher for SubstringMatcher {
    fn name(&self) -> &str {
        "substring"
    }

    fn matches(&self, source: &str, generated: &str) -> bool {
        let a = normalize_topic_name(source);
        let b = normalize_topic_name(generated);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        a.contains(&b) || b.contains(&a)
    }
}
