//! Topic vocabulary types.
//!
//! A topic is a short free-text label. There is no canonical id: two labels
//! refer to the same subject only if a [`TopicMatcher`](crate::TopicMatcher)
//! says so at comparison time.

use serde::{Deserialize, Serialize};

/// A human-readable subject label, e.g. `"Hepatite B"`.
pub type Topic = String;

/// Label used for generated items that arrive without a topic.
pub const FALLBACK_TOPIC: &str = "General";

/// How prominent a topic is within its source document, as judged by the
/// extraction step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Relevance {
    /// More than ~20% of the content.
    High,
    /// Between ~5% and ~20% of the content.
    #[default]
    Medium,
    /// Less than ~5% of the content.
    Low,
}

impl Relevance {
    /// Numeric weight; higher means more relevant.
    pub fn score(self) -> u8 {
        match self {
            Relevance::High => 3,
            Relevance::Medium => 2,
            Relevance::Low => 1,
        }
    }
}

// Unknown labels from the extractor degrade to Medium instead of failing
// the whole vocabulary.
impl From<String> for Relevance {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Relevance::High,
            "low" => Relevance::Low,
            _ => Relevance::Medium,
        }
    }
}

impl std::fmt::Display for Relevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Relevance::High => "high",
            Relevance::Medium => "medium",
            Relevance::Low => "low",
        };
        f.write_str(s)
    }
}

/// A topic as returned by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTopic {
    /// The topic label
    pub name: Topic,

    /// Prominence within the source
    #[serde(default)]
    pub relevance: Relevance,

    /// How many times the extractor saw it mentioned, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_count: Option<u32>,
}

impl ExtractedTopic {
    pub fn new(name: impl Into<Topic>, relevance: Relevance) -> Self {
        Self {
            name: name.into(),
            relevance,
            mention_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_relevance_falls_back_to_medium() {
        let t: ExtractedTopic =
            serde_json::from_str(r#"{"name":"Cirrose","relevance":"critical"}"#).unwrap();
        assert_eq!(t.relevance, Relevance::Medium);
        assert_eq!(t.mention_count, None);
    }

    #[test]
    fn relevance_parses_case_insensitively() {
        let t: ExtractedTopic =
            serde_json::from_str(r#"{"name":"Asma","relevance":"HIGH","mention_count":4}"#)
                .unwrap();
        assert_eq!(t.relevance, Relevance::High);
        assert_eq!(t.mention_count, Some(4));
    }

    #[test]
    fn missing_relevance_defaults() {
        let t: ExtractedTopic = serde_json::from_str(r#"{"name":"DPOC"}"#).unwrap();
        assert_eq!(t.relevance, Relevance::Medium);
    }

    #[test]
    fn relevance_serializes_lowercase() {
        let json = serde_json::to_string(&ExtractedTopic::new("Gota", Relevance::Low)).unwrap();
        assert!(json.contains(r#""relevance":"low""#));
        assert!(!json.contains("mention_count"));
    }

    #[test]
    fn scores_are_ordered() {
        assert!(Relevance::High.score() > Relevance::Medium.score());
        assert!(Relevance::Medium.score() > Relevance::Low.score());
    }
}
