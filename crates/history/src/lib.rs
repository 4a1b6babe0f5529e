//! History store implementations and the session-window aggregator for
//! Topicwise.

pub mod noop;
pub mod in_memory;
pub mod file_backend;
pub mod aggregator;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use noop::NoopHistory;
pub use in_memory::InMemoryHistory;
pub use file_backend::FileHistory;
pub use aggregator::{count_topics, most_recent_sessions, HistoryAggregator};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteHistory;
