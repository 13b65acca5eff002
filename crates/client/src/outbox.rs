// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable outbox for submissions produced while offline.
//!
//! Backed by SQLite so staged records survive process restarts and crashes.
//! Every operation commits before returning; there is no write-behind
//! buffering. A record enqueued here stays until the server accepts it or an
//! operator discards it.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde_json::Value;

use holo_core::StagedRecord;

/// SQL schema for the outbox database.
///
/// `AUTOINCREMENT` guarantees ids are monotonically increasing and never
/// reused, which is what insertion-order draining relies on.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS attendance_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Error type for outbox operations.
///
/// Storage faults are fatal to the operation invoked and always surfaced:
/// losing durability silently would defeat the component's purpose.
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    /// Underlying SQLite error (quota, corruption, locked).
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Payload could not be serialized or a stored row could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error creating the database directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored timestamp could not be parsed.
    #[error("corrupt created_at on record {id}: {source}")]
    CorruptTimestamp {
        /// Id of the affected record.
        id: i64,
        /// Underlying parse error.
        source: chrono::ParseError,
    },
}

/// Result type for outbox operations.
pub type OutboxResult<T> = Result<T, OutboxError>;

/// Durable queue store for not-yet-confirmed submissions.
pub struct Outbox {
    /// The underlying SQLite connection.
    conn: Connection,
}

impl Outbox {
    /// Open (or create) the outbox database at the given path.
    pub fn open(path: &Path) -> OutboxResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL for concurrent readers; synchronous=FULL so an enqueue that has
        // returned is on disk even across a power cut.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(Outbox { conn })
    }

    /// Open an in-memory outbox (for testing).
    pub fn open_in_memory() -> OutboxResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Outbox { conn })
    }

    /// Stage a payload, returning the store-assigned id.
    ///
    /// The record is durable by the time this returns.
    pub fn enqueue(&self, payload: &Value) -> OutboxResult<i64> {
        let body = serde_json::to_string(payload)?;
        self.conn.execute(
            "INSERT INTO attendance_queue (payload, created_at) VALUES (?1, ?2)",
            params![body, Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All staged records in insertion order.
    pub fn pending(&self) -> OutboxResult<Vec<StagedRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload, created_at FROM attendance_queue ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, payload, created_at) = row?;
            let payload: Value = serde_json::from_str(&payload)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|source| OutboxError::CorruptTimestamp { id, source })?
                .with_timezone(&Utc);
            records.push(StagedRecord {
                id,
                payload,
                created_at,
            });
        }
        Ok(records)
    }

    /// Delete a record. Idempotent: removing an unknown id is not an error.
    pub fn remove(&self, id: i64) -> OutboxResult<()> {
        self.conn
            .execute("DELETE FROM attendance_queue WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Operator discard of the whole backlog.
    pub fn clear(&self) -> OutboxResult<()> {
        self.conn.execute("DELETE FROM attendance_queue", [])?;
        Ok(())
    }

    /// Number of staged records.
    pub fn count(&self) -> OutboxResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM attendance_queue", [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    /// Check if the outbox is empty.
    pub fn is_empty(&self) -> OutboxResult<bool> {
        Ok(self.count()? == 0)
    }
}
