// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live push stream event model.
//!
//! The server pushes JSON messages of the form `{"type": ..., "payload": ...}`.
//! Kinds outside the known set are preserved as [`EventKind::Other`] so
//! consumers can render a generic fallback instead of dropping the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a server-pushed event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A student was verified and marked present.
    AttendanceUpdate,
    /// An entry was appended to the audit trail.
    AuditLog,
    /// Server resource / health sample.
    SystemHealth,
    /// A kind this client does not recognize. Kept, not discarded.
    #[serde(untagged)]
    Other(String),
}

impl EventKind {
    /// True when the kind is one this client knows how to render natively.
    pub fn is_known(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }
}

/// One inbound push message as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamFrame {
    /// Event kind discriminator.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Kind-specific body, opaque to the stream client.
    pub payload: Value,
}

/// A received push event with arrival metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LiveEvent {
    /// Arrival sequence number, unique within the session buffer.
    pub id: u64,
    /// Event kind.
    pub kind: EventKind,
    /// Kind-specific body.
    pub payload: Value,
    /// Local receipt time.
    pub received_at: DateTime<Utc>,
}

impl LiveEvent {
    /// Builds a live event from a parsed frame, stamping the arrival id and
    /// receipt time.
    pub fn from_frame(id: u64, frame: StreamFrame) -> Self {
        LiveEvent {
            id,
            kind: frame.kind,
            payload: frame.payload,
            received_at: Utc::now(),
        }
    }
}
