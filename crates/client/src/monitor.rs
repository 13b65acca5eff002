// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state with deduplicated transitions.
//!
//! The monitor consumes host online/offline signals passively via
//! [`NetworkMonitor::report`] and fans them out to subscribers over a watch
//! channel. It never touches the network or the queue itself; on an online
//! transition the sync engine (a subscriber) decides to drain.
//!
//! The monitor cannot fail. When no host signal exists, construct it with
//! [`NetworkMonitor::assume_online`]: the engine then discovers outages only
//! through submission errors, which is an acceptable degraded mode.

use tokio::sync::watch;

/// Host connectivity as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Submissions are expected to reach the server.
    Online,
    /// Submissions are staged in the outbox instead.
    Offline,
}

impl ConnectionState {
    /// True when online.
    pub fn is_online(self) -> bool {
        self == ConnectionState::Online
    }
}

/// Connectivity monitor with exactly-once transition events.
pub struct NetworkMonitor {
    tx: watch::Sender<ConnectionState>,
}

impl NetworkMonitor {
    /// Create a monitor with a known initial state.
    pub fn new(initial: ConnectionState) -> Self {
        let (tx, _) = watch::channel(initial);
        NetworkMonitor { tx }
    }

    /// Create a monitor with no underlying host signal.
    pub fn assume_online() -> Self {
        NetworkMonitor::new(ConnectionState::Online)
    }

    /// Current state, readable synchronously.
    pub fn current(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    /// Feed a host connectivity signal into the monitor.
    ///
    /// Duplicate reports are swallowed: subscribers see one change per actual
    /// transition. Returns true when the state actually changed.
    pub fn report(&self, state: ConnectionState) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            match state {
                ConnectionState::Online => tracing::info!("network: online"),
                ConnectionState::Offline => tracing::warn!("network: offline"),
            }
        }
        changed
    }

    /// Subscribe to state transitions.
    ///
    /// The receiver yields the current state immediately on first read and
    /// then once per transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        NetworkMonitor::assume_online()
    }
}
