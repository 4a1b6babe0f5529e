//! SQLite history backend.
//!
//! Uses a single table, `history_records`, indexed on `(scope, created_at)`
//! so the newest-first read for one scope never scans other scopes.
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix), which sort lexicographically in time order.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use topicwise_core::error::HistoryError;
use topicwise_core::history::{HistoryQuery, HistoryRecord, HistoryStore};
use tracing::{debug, info};

/// A production SQLite history store.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Open (or create) a SQLite store from a file path.
    ///
    /// The database and its table/index are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| HistoryError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // An in-memory database lives and dies with its connection.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, HistoryError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations. Creates the table and its index.
    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history_records (
                iid         INTEGER PRIMARY KEY AUTOINCREMENT,
                scope       TEXT NOT NULL,
                topic       TEXT NOT NULL,
                session_id  TEXT NOT NULL,
                created_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("history_records table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_history_scope_created \
             ON history_records(scope, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("scope index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `HistoryRecord` from a SQLite row.
    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryRecord, HistoryError> {
        let scope: String = row
            .try_get("scope")
            .map_err(|e| HistoryError::QueryFailed(format!("scope column: {e}")))?;
        let topic: String = row
            .try_get("topic")
            .map_err(|e| HistoryError::QueryFailed(format!("topic column: {e}")))?;
        let session_id: String = row
            .try_get("session_id")
            .map_err(|e| HistoryError::QueryFailed(format!("session_id column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| HistoryError::QueryFailed(format!("created_at column: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| HistoryError::QueryFailed(format!("created_at value: {e}")))?;

        Ok(HistoryRecord {
            scope,
            topic,
            session_id,
            created_at,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append(&self, records: Vec<HistoryRecord>) -> Result<usize, HistoryError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HistoryError::Storage(format!("BEGIN failed: {e}")))?;

        for record in &records {
            let created_at = record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
            sqlx::query(
                "INSERT INTO history_records (scope, topic, session_id, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&record.scope)
            .bind(&record.topic)
            .bind(&record.session_id)
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| HistoryError::Storage(format!("INSERT failed: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| HistoryError::Storage(format!("COMMIT failed: {e}")))?;

        debug!(count = records.len(), "Appended history records");
        Ok(records.len())
    }

    async fn recent(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = sqlx::query(
            "SELECT scope, topic, session_id, created_at FROM history_records \
             WHERE scope = ?1 ORDER BY created_at DESC, iid DESC LIMIT ?2",
        )
        .bind(&query.scope)
        .bind(query.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("recent: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn count(&self, scope: &str) -> Result<usize, HistoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM history_records WHERE scope = ?1")
            .bind(scope)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HistoryError::QueryFailed(format!("count: {e}")))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| HistoryError::QueryFailed(format!("count column: {e}")))?;
        Ok(n as usize)
    }

    async fn clear(&self, scope: &str) -> Result<usize, HistoryError> {
        let result = sqlx::query("DELETE FROM history_records WHERE scope = ?1")
            .bind(scope)
            .execute(&self.pool)
            .await
            .map_err(|e| HistoryError::Storage(format!("DELETE failed: {e}")))?;
        Ok(result.rows_affected() as usize)
    }
}
