//! History trait: the record of previously generated items.
//!
//! Every generated item (a quiz question, a flashcard) leaves behind one
//! [`HistoryRecord`] tagged with the topic it was generated for and the
//! session (batch) it belonged to. Sessions are not stored: they are
//! reconstructed on demand with [`group_sessions`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::HistoryError;
use crate::topic::Topic;

/// One previously generated item. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Project or document the item was generated for
    pub scope: String,

    /// Topic label the item was generated under
    pub topic: Topic,

    /// Identifier shared by every item of the same generation batch
    pub session_id: String,

    /// When the item was generated
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(
        scope: impl Into<String>,
        topic: impl Into<Topic>,
        session_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            scope: scope.into(),
            topic: topic.into(),
            session_id: session_id.into(),
            created_at,
        }
    }
}

/// A read request against a [`HistoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Scope to read
    pub scope: String,

    /// Maximum number of records, newest first
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    150
}

impl HistoryQuery {
    pub fn new(scope: impl Into<String>, limit: usize) -> Self {
        Self {
            scope: scope.into(),
            limit,
        }
    }
}

/// All records sharing one `session_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,

    /// Timestamp of the earliest record in the session
    pub started_at: DateTime<Utc>,

    pub records: Vec<HistoryRecord>,
}

/// Group flat records into sessions.
///
/// Sessions come out in order of first appearance in `records`; each
/// session's records keep their input order. `started_at` is the earliest
/// `created_at` among the session's records.
pub fn group_sessions(records: Vec<HistoryRecord>) -> Vec<Session> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sessions: Vec<Session> = Vec::new();

    for record in records {
        match index.get(&record.session_id) {
            Some(&i) => {
                let session = &mut sessions[i];
                if record.created_at < session.started_at {
                    session.started_at = record.created_at;
                }
                session.records.push(record);
            }
            None => {
                index.insert(record.session_id.clone(), sessions.len());
                sessions.push(Session {
                    id: record.session_id.clone(),
                    started_at: record.created_at,
                    records: vec![record],
                });
            }
        }
    }

    sessions
}

/// The core HistoryStore trait.
///
/// Implementations: SQLite, JSONL file, in-memory (for testing), none (no-op).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "file", "none").
    fn name(&self) -> &str;

    /// Append records. Returns how many were written.
    async fn append(&self, records: Vec<HistoryRecord>) -> std::result::Result<usize, HistoryError>;

    /// Fetch records for a scope, newest first, up to `query.limit`.
    async fn recent(&self, query: HistoryQuery) -> std::result::Result<Vec<HistoryRecord>, HistoryError>;

    /// Number of records stored for a scope.
    async fn count(&self, scope: &str) -> std::result::Result<usize, HistoryError>;

    /// Remove every record of a scope. Returns how many were removed.
    async fn clear(&self, scope: &str) -> std::result::Result<usize, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn groups_by_session_id() {
        let records = vec![
            HistoryRecord::new("p1", "Asma", "s2", at(30)),
            HistoryRecord::new("p1", "DPOC", "s1", at(10)),
            HistoryRecord::new("p1", "Asma", "s2", at(31)),
        ];
        let sessions = group_sessions(records);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "s2");
        assert_eq!(sessions[0].records.len(), 2);
        assert_eq!(sessions[1].id, "s1");
    }

    #[test]
    fn session_starts_at_earliest_record() {
        let records = vec![
            HistoryRecord::new("p1", "Asma", "s1", at(45)),
            HistoryRecord::new("p1", "DPOC", "s1", at(40)),
            HistoryRecord::new("p1", "Gota", "s1", at(50)),
        ];
        let sessions = group_sessions(records);
        assert_eq!(sessions[0].started_at, at(40));
    }

    #[test]
    fn empty_input_has_no_sessions() {
        assert!(group_sessions(vec![]).is_empty());
    }

    #[test]
    fn query_limit_defaults() {
        let q: HistoryQuery = serde_json::from_str(r#"{"scope":"p1"}"#).unwrap();
        assert_eq!(q.limit, 150);
    }
}
