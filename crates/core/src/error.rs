//! Error types for the Topicwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Topicwise operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- History errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Allocation errors ---
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// There is nothing to distribute items across. Usually means the topic
    /// extraction step upstream produced nothing or was never run.
    #[error("Cannot allocate {total} items: the topic list is empty")]
    NoTopics { total: usize },
}
