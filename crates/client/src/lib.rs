// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! holo-client - offline-first sync core for the holo attendance terminal.
//!
//! The terminal keeps recording attendance while the network is down. This
//! crate implements the parts that make that safe:
//!
//! - [`Outbox`] - durable SQLite-backed queue of unconfirmed submissions
//! - [`NetworkMonitor`] - connectivity state with deduplicated transitions
//! - [`SyncEngine`] - single-flight drain of the outbox against the server
//! - [`stream::LiveStream`] - server-push consumer with bounded history and
//!   automatic reconnect
//!
//! # Architecture
//!
//! ```text
//! producer ──► Outbox ──► SyncEngine ──► Submitter ──► server
//!                ▲            ▲
//!                │            │ online transitions
//!                │      NetworkMonitor
//!                │
//! server ──► LiveStream ──► bounded buffer ──► observers
//! ```
//!
//! The outbox is the only shared mutable resource; the engine re-reads it at
//! every drain pass and never holds records across passes.

pub mod bus;
pub mod config;
pub mod engine;
pub mod monitor;
pub mod outbox;
pub mod stream;
pub mod submit;

pub use bus::Observers;
pub use config::AgentConfig;
pub use engine::{DrainOutcome, SyncEngine, SyncNotice};
pub use monitor::{ConnectionState, NetworkMonitor};
pub use outbox::{Outbox, OutboxError, OutboxResult};
pub use stream::{LiveStream, StreamConfig, StreamState};
pub use submit::{HttpSubmitter, SubmitOutcome, Submitter};

#[cfg(test)]
mod test_helpers;
