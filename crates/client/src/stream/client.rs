// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live stream client: bounded history plus reconnect-forever run loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use holo_core::{LiveEvent, StreamFrame};

use crate::bus::Observers;

use super::transport::StreamTransport;

/// Default bounded history size.
const DEFAULT_CAPACITY: usize = 50;

/// Default delay before a reconnect attempt.
const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Configuration for the live stream client.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// URL of the push endpoint.
    pub url: String,
    /// Fixed delay between reconnect attempts.
    ///
    /// TODO: revisit as bounded exponential backoff; a fleet of terminals
    /// reconnecting every 3s can pile onto a degraded server.
    pub reconnect_delay: Duration,
    /// Maximum number of buffered events.
    pub capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            url: "ws://localhost:8000/api/stream".to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// State of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Opening the connection.
    Connecting,
    /// Receiving events.
    Connected,
    /// Connection lost or not yet started; a reconnect may be pending.
    Disconnected,
}

/// Consumer of the server-push event stream.
///
/// The buffer is volatile by design: it exists for recency display, not
/// durability, and holds at most `capacity` events, most recent first.
pub struct LiveStream {
    config: StreamConfig,
    buffer: Mutex<VecDeque<LiveEvent>>,
    /// Arrival sequence counter; the next event gets `next_id + 1`.
    next_id: AtomicU64,
    state_tx: watch::Sender<StreamState>,
    observers: Observers<LiveEvent>,
    shutdown_tx: watch::Sender<bool>,
}

impl LiveStream {
    /// Create a stream client. It does nothing until [`LiveStream::run`].
    pub fn new(config: StreamConfig) -> Arc<Self> {
        let (state_tx, _) = watch::channel(StreamState::Disconnected);
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(LiveStream {
            config,
            buffer: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(0),
            state_tx,
            observers: Observers::new(),
            shutdown_tx,
        })
    }

    /// Current connection state.
    pub fn state(&self) -> StreamState {
        *self.state_tx.borrow()
    }

    /// Subscribe to connection state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<StreamState> {
        self.state_tx.subscribe()
    }

    /// Observer registry invoked synchronously on each parsed event.
    pub fn observers(&self) -> &Observers<LiveEvent> {
        &self.observers
    }

    /// Snapshot of the buffered events, most recent first.
    pub fn events(&self) -> Vec<LiveEvent> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// The most recently received event, if any.
    pub fn latest(&self) -> Option<LiveEvent> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .front()
            .cloned()
    }

    /// Explicit teardown. Ends the run loop, cancelling a pending reconnect
    /// so a connection is not resurrected after the consumer is gone.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Parse one raw message and, if valid, buffer and publish it.
    ///
    /// A malformed message is logged and dropped without touching the
    /// connection; it produces no buffer entry.
    pub fn ingest(&self, raw: &str) -> Option<LiveEvent> {
        let frame: StreamFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("discarding malformed stream message: {}", e);
                return None;
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let event = LiveEvent::from_frame(id, frame);

        {
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.push_front(event.clone());
            buffer.truncate(self.config.capacity);
        }

        self.observers.emit(&event);
        Some(event)
    }

    fn set_state(&self, state: StreamState) {
        self.state_tx.send_replace(state);
    }

    /// Run the connect/read/reconnect loop until [`LiveStream::shutdown`].
    ///
    /// Reconnection is automatic and unlimited with a fixed delay between
    /// attempts. The loop owns the transport; all shared state is reachable
    /// through the `Arc`.
    pub async fn run<T: StreamTransport>(self: Arc<Self>, mut transport: T) {
        let mut shutdown = self.shutdown_tx.subscribe();
        let mut attempts: u32 = 0;

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            self.set_state(StreamState::Connecting);
            match transport.connect(&self.config.url).await {
                Ok(()) => {
                    attempts = 0;
                    self.set_state(StreamState::Connected);
                    tracing::info!(url = %self.config.url, "live stream connected");
                    self.read_until_closed(&mut transport, &mut shutdown).await;
                    if *shutdown.borrow() {
                        break;
                    }
                }
                Err(e) => {
                    attempts += 1;
                    self.set_state(StreamState::Disconnected);
                    tracing::warn!(attempts, "live stream connect failed: {}", e);
                }
            }

            // Fixed-delay reconnect; shutdown cancels the pending timer.
            tokio::select! {
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let _ = transport.disconnect().await;
        self.set_state(StreamState::Disconnected);
        tracing::info!("live stream stopped");
    }

    /// Read messages until the connection drops or shutdown is requested.
    async fn read_until_closed<T: StreamTransport>(
        &self,
        transport: &mut T,
        shutdown: &mut watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
                msg = transport.recv() => match msg {
                    Ok(Some(raw)) => {
                        self.ingest(&raw);
                    }
                    Ok(None) => {
                        tracing::warn!("live stream closed by server");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("live stream receive error: {}", e);
                        break;
                    }
                }
            }
        }

        let _ = transport.disconnect().await;
        self.set_state(StreamState::Disconnected);
    }
}
