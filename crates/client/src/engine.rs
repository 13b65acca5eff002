// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: drains the outbox against the submission endpoint.
//!
//! A drain pass reads the pending records once, then submits them strictly
//! sequentially in insertion order. Per-record outcomes:
//!
//! - accepted: record removed, pass continues
//! - rejected (4xx): record removed so a poison payload cannot block the
//!   queue; the rejection is published to observers
//! - unavailable (network/timeout/5xx): the pass stops; the failing record
//!   and everything after it stay staged for the next trigger
//!
//! `drain` is single-flight: overlapping timers and online transitions cannot
//! start two passes. There is no retry cap; records persist until accepted or
//! explicitly discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::watch;

use holo_core::StagedRecord;

use crate::bus::Observers;
use crate::monitor::ConnectionState;
use crate::outbox::{Outbox, OutboxResult};
use crate::submit::{SubmitOutcome, Submitter};

/// Result of one `drain` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every pending record was processed (accepted or rejected).
    Completed {
        /// Records the server accepted.
        accepted: usize,
        /// Records dropped after permanent rejection.
        rejected: usize,
    },
    /// The pass stopped on a transient failure; `remaining` records stay
    /// staged for the next trigger.
    Stopped {
        /// Records the server accepted before the stop.
        accepted: usize,
        /// Records dropped after permanent rejection before the stop.
        rejected: usize,
        /// Backlog left in the outbox.
        remaining: u64,
    },
    /// Another drain was already in progress; this call did nothing.
    AlreadyDraining,
}

/// Out-of-band notification published to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncNotice {
    /// The server permanently rejected a record; it has been dropped.
    Rejected {
        /// The dropped record.
        record: StagedRecord,
        /// HTTP status code.
        status: u16,
        /// Server-supplied reason.
        message: String,
    },
}

/// Drains the outbox when connectivity allows.
pub struct SyncEngine {
    outbox: Arc<Mutex<Outbox>>,
    submitter: Box<dyn Submitter>,
    /// Single-flight guard: true while a drain pass is running.
    draining: AtomicBool,
    notices: Observers<SyncNotice>,
    backlog_tx: watch::Sender<u64>,
}

impl SyncEngine {
    /// Create an engine over the given outbox and submission transport.
    pub fn new(outbox: Arc<Mutex<Outbox>>, submitter: Box<dyn Submitter>) -> OutboxResult<Self> {
        let depth = outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .count()?;
        let (backlog_tx, _) = watch::channel(depth);
        Ok(SyncEngine {
            outbox,
            submitter,
            draining: AtomicBool::new(false),
            notices: Observers::new(),
            backlog_tx,
        })
    }

    fn lock_outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stage a payload in the outbox and refresh the published backlog.
    ///
    /// This is the producer entry point used when a submission cannot be
    /// confirmed sent.
    pub fn stage(&self, payload: &Value) -> OutboxResult<i64> {
        let id = self.lock_outbox().enqueue(payload)?;
        tracing::info!(id, "record staged for later submission");
        self.refresh_backlog()?;
        Ok(id)
    }

    /// Observer registry for permanent-rejection notices.
    pub fn notices(&self) -> &Observers<SyncNotice> {
        &self.notices
    }

    /// Subscribe to the published backlog depth.
    pub fn backlog(&self) -> watch::Receiver<u64> {
        self.backlog_tx.subscribe()
    }

    /// True while a drain pass is in progress.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Recompute the backlog depth and publish it.
    pub fn refresh_backlog(&self) -> OutboxResult<u64> {
        let depth = self.lock_outbox().count()?;
        self.backlog_tx.send_replace(depth);
        Ok(depth)
    }

    /// Attempt one drain pass. Single-flight: a call while a pass is running
    /// returns [`DrainOutcome::AlreadyDraining`] without touching the outbox.
    pub async fn drain(&self) -> OutboxResult<DrainOutcome> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("drain already in progress, skipping");
            return Ok(DrainOutcome::AlreadyDraining);
        }

        let result = self.drain_pass().await;
        self.draining.store(false, Ordering::SeqCst);
        result
    }

    async fn drain_pass(&self) -> OutboxResult<DrainOutcome> {
        // Read once at pass start; the outbox is re-read on the next pass
        // rather than acting on records held across triggers.
        let records = self.lock_outbox().pending()?;
        if records.is_empty() {
            return Ok(DrainOutcome::Completed {
                accepted: 0,
                rejected: 0,
            });
        }

        tracing::info!(pending = records.len(), "drain pass starting");

        let mut accepted = 0;
        let mut rejected = 0;
        let mut stopped = false;

        for record in records {
            match self.submitter.submit(&record.payload).await {
                SubmitOutcome::Accepted => {
                    self.lock_outbox().remove(record.id)?;
                    accepted += 1;
                    tracing::info!(id = record.id, "record accepted");
                }
                SubmitOutcome::Rejected { status, message } => {
                    self.lock_outbox().remove(record.id)?;
                    rejected += 1;
                    tracing::warn!(id = record.id, status, "record rejected, dropping");
                    self.notices.emit(&SyncNotice::Rejected {
                        record,
                        status,
                        message,
                    });
                }
                SubmitOutcome::Unavailable { reason } => {
                    tracing::info!(id = record.id, %reason, "transient failure, stopping pass");
                    stopped = true;
                    break;
                }
            }
        }

        let remaining = self.refresh_backlog()?;

        if stopped {
            Ok(DrainOutcome::Stopped {
                accepted,
                rejected,
                remaining,
            })
        } else {
            Ok(DrainOutcome::Completed { accepted, rejected })
        }
    }

    /// Drive the engine from monitor transitions: drains once if already
    /// online, then on every offline-to-online edge. Runs until the monitor
    /// is dropped. Storage faults are logged and the loop keeps going; the
    /// next transition retries from current store contents.
    pub async fn run(&self, mut states: watch::Receiver<ConnectionState>) {
        if states.borrow_and_update().is_online() {
            self.drain_logged().await;
        }

        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            if state.is_online() {
                self.drain_logged().await;
            }
        }
    }

    async fn drain_logged(&self) {
        match self.drain().await {
            Ok(outcome) => tracing::debug!(?outcome, "drain finished"),
            Err(e) => tracing::error!("drain failed: {}", e),
        }
    }
}
