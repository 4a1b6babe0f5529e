//! File-based history backend: persistent JSON-lines storage.
//!
//! Each line is a JSON-encoded `HistoryRecord`. Records are only ever
//! appended; clearing a scope rewrites the file without its lines.
//!
//! Storage location: `~/.topicwise/history.jsonl`
//!
//! Simple, portable, human-inspectable, and needs no database.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use topicwise_core::error::HistoryError;
use topicwise_core::history::{HistoryQuery, HistoryRecord, HistoryStore};
use tracing::{debug, warn};

use crate::in_memory::newest_first;

/// A file-backed history store using JSONL (one JSON object per line).
///
/// Records are loaded into memory on creation; appends go straight to the
/// end of the file.
pub struct FileHistory {
    path: PathBuf,
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl FileHistory {
    /// Open a file-based store at the given path.
    ///
    /// If the file exists, records are loaded from it.
    /// If it does not exist, starts empty (file created on first append).
    pub fn new(path: PathBuf) -> Self {
        let records = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = records.len(), "File history loaded");
        Self {
            path,
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load records from a JSONL file, skipping lines that do not parse.
    fn load_from_disk(path: &Path) -> Vec<HistoryRecord> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // Not created yet
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<HistoryRecord>(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted history line");
                    None
                }
            })
            .collect()
    }

    fn ensure_parent(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HistoryError::Storage(format!("Failed to create history directory: {e}"))
            })?;
        }
        Ok(())
    }

    fn encode(records: &[HistoryRecord]) -> Result<String, HistoryError> {
        let mut content = String::new();
        for record in records {
            let line = serde_json::to_string(record).map_err(|e| {
                HistoryError::Storage(format!("Failed to serialize history record: {e}"))
            })?;
            content.push_str(&line);
            content.push('\n');
        }
        Ok(content)
    }
}

#[async_trait]
impl HistoryStore for FileHistory {
    fn name(&self) -> &str {
        "file"
    }

    async fn append(&self, records: Vec<HistoryRecord>) -> Result<usize, HistoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        let content = Self::encode(&records)?;

        let mut guard = self.records.write().await;
        self.ensure_parent()?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| HistoryError::Storage(format!("Failed to open history file: {e}")))?;
        file.write_all(content.as_bytes())
            .map_err(|e| HistoryError::Storage(format!("Failed to write history file: {e}")))?;

        let n = records.len();
        guard.extend(records);
        Ok(n)
    }

    async fn recent(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>, HistoryError> {
        let records = self.records.read().await;
        Ok(newest_first(&records, &query.scope, query.limit))
    }

    async fn count(&self, scope: &str) -> Result<usize, HistoryError> {
        Ok(self.records.read().await.iter().filter(|r| r.scope == scope).count())
    }

    async fn clear(&self, scope: &str) -> Result<usize, HistoryError> {
        let mut records = self.records.write().await;
        let len_before = records.len();
        records.retain(|r| r.scope != scope);
        let removed = len_before - records.len();
        if removed > 0 {
            self.ensure_parent()?;
            std::fs::write(&self.path, Self::encode(&records)?).map_err(|e| {
                HistoryError::Storage(format!("Failed to write history file: {e}"))
            })?;
        }
        Ok(removed)
    }
}
