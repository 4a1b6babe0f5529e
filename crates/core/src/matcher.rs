//! Topic matching trait. Decides whether two independently produced labels
//! name the same subject.
//!
//! The coverage analyzer only ever compares topics through this trait, so a
//! smarter strategy (embeddings, a synonym table) can replace the default
//! substring matcher without touching the rest of the engine.

/// Decides fuzzy topic identity.
pub trait TopicMatcher: Send + Sync {
    /// Strategy name, for logs.
    fn name(&self) -> &str;

    /// Whether `source` (from extraction) and `generated` (an item label)
    /// refer to the same topic.
    fn matches(&self, source: &str, generated: &str) -> bool;
}
