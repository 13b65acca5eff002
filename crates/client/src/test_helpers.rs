// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the client crate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::submit::{SubmitOutcome, Submitter};

/// Build a distinguishable attendance payload.
pub fn make_payload(n: u32) -> Value {
    json!({"student_id": format!("S-{n:03}"), "method": "face"})
}

/// Scripted submitter: returns the queued outcomes in order, then `Accepted`
/// once the script is exhausted. Records every submitted payload.
#[derive(Clone)]
pub struct MockSubmitter {
    inner: Arc<MockSubmitterInner>,
}

struct MockSubmitterInner {
    script: Mutex<VecDeque<SubmitOutcome>>,
    calls: Mutex<Vec<Value>>,
}

impl MockSubmitter {
    pub fn new(script: Vec<SubmitOutcome>) -> Self {
        MockSubmitter {
            inner: Arc::new(MockSubmitterInner {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn accepting() -> Self {
        MockSubmitter::new(Vec::new())
    }

    /// Payloads submitted so far, in submission order.
    pub fn calls(&self) -> Vec<Value> {
        self.inner.calls.lock().unwrap().clone()
    }
}

impl Submitter for MockSubmitter {
    fn submit<'a>(
        &'a self,
        payload: &'a Value,
    ) -> Pin<Box<dyn Future<Output = SubmitOutcome> + Send + 'a>> {
        Box::pin(async move {
            self.inner.calls.lock().unwrap().push(payload.clone());
            self.inner
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(SubmitOutcome::Accepted)
        })
    }
}
