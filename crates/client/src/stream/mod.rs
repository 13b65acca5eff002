// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live server-push event stream.
//!
//! Consumes the long-lived push connection from the attendance server,
//! keeping a bounded most-recent-first history for the presentation layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ LiveStream  │◄────│  Transport   │◄────│   Server    │
//! │ (run loop)  │     │   (trait)    │     │             │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Buffer    │  (50 most recent, volatile)
//! │ + Observers │
//! └─────────────┘
//! ```
//!
//! # Behavior
//!
//! - One malformed message is logged and discarded; the connection stays up
//! - Connection loss schedules a reconnect after a fixed delay, forever
//! - `shutdown()` cancels a pending reconnect as well as an open connection

mod client;
mod transport;

pub use client::{LiveStream, StreamConfig, StreamState};
pub use transport::{StreamTransport, TransportError, TransportResult, WebSocketTransport};

#[cfg(test)]
mod client_tests;
