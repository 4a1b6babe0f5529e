//! # Topicwise Engine
//!
//! The adaptive topic coverage algorithms:
//!
//! | Module | Role |
//! |--------|------|
//! | [`sampler`] | Deterministic start / interior / end excerpt of oversized documents |
//! | [`allocator`] | Deficit-weighted integer quotas that sum exactly to the batch size |
//! | [`coverage`] | Fuzzy reconciliation of source topics with generated labels |
//! | [`policy`] | How many items a batch should contain |
//! | [`vocabulary`] | Normalizing, deduplicating and parsing topic lists |
//! | [`prompt`] | Rendering quotas for the generation step |
//! | [`planner`] | History + policy + allocator wired into one call |
//!
//! Everything outside [`planner`] is synchronous and pure.

pub mod sampler;
pub mod allocator;
pub mod matcher;
pub mod coverage;
pub mod policy;
pub mod vocabulary;
pub mod prompt;
pub mod planner;

pub use sampler::{sample, Sampler, MARKER_OVERHEAD};
pub use allocator::{allocate, uncovered_by_history, NEVER_SEEN_DEFICIT};
pub use matcher::SubstringMatcher;
pub use coverage::{analyze, tally_topics, CoverageAnalyzer};
pub use policy::{ClampedTopicCount, FixedCount, QuestionCount, QuestionCountPolicy};
pub use vocabulary::{
    aggregate_topics, deduplicate_topics, extract_heading_topics, normalize_topic_name,
    parse_extraction_response, relevance_distribution,
};
pub use prompt::format_distribution;
pub use planner::{BatchPlan, BatchPlanner};
