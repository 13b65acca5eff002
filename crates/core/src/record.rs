// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Staged attendance records awaiting delivery confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record staged in the outbox until the server confirms receipt.
///
/// A staged record exists from the moment a submission cannot be confirmed
/// sent until the server accepts it or an operator discards it. It is never
/// updated in place: it is either present or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StagedRecord {
    /// Store-assigned identifier. Unique within the store, never reused.
    pub id: i64,
    /// Opaque submission body. The store never interprets or mutates it.
    pub payload: Value,
    /// When the record was staged. Immutable.
    pub created_at: DateTime<Utc>,
}

impl StagedRecord {
    /// Creates a staged record with the given id and payload, timestamped now.
    pub fn new(id: i64, payload: Value) -> Self {
        StagedRecord {
            id,
            payload,
            created_at: Utc::now(),
        }
    }
}
