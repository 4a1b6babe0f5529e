//! # Topicwise Core
//!
//! Domain types, traits, and error definitions for the Topicwise adaptive
//! topic coverage engine. This crate has **no storage or runtime
//! dependencies**. It defines the domain model that the history backends
//! and the engine implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is defined as a trait here:
//! - [`HistoryStore`]: where past generation records come from
//! - [`TopicMatcher`]: how two topic labels are reconciled
//!
//! Implementations live in their respective crates, which keeps the
//! allocation and coverage algorithms testable with in-memory stubs.

pub mod error;
pub mod topic;
pub mod history;
pub mod quota;
pub mod coverage;
pub mod matcher;

// Re-export key types at crate root for ergonomics
pub use error::{AllocationError, Error, HistoryError, Result};
pub use topic::{ExtractedTopic, Relevance, Topic, FALLBACK_TOPIC};
pub use history::{group_sessions, HistoryQuery, HistoryRecord, HistoryStore, Session};
pub use quota::{total_quota, QuotaEntry, TopicFrequencyMap};
pub use coverage::{estimate_sessions_for_full_coverage, CoverageReport};
pub use matcher::TopicMatcher;
