// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Submission transport for staged records.
//!
//! The [`Submitter`] trait abstracts the HTTP POST to the verification
//! endpoint, allowing mock implementations in tests. Failures are folded into
//! [`SubmitOutcome`] rather than an error type because the drain loop treats
//! them as data: transient outcomes stop the pass, permanent ones drop the
//! record.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

/// Per-record result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the record (2xx). Safe to remove from the outbox.
    Accepted,
    /// The server judged the payload invalid (4xx). Retrying can never
    /// succeed; the record is dropped and the rejection reported.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for the operator.
        message: String,
    },
    /// Network error, timeout, or 5xx. The record stays staged and the drain
    /// pass stops; a later pass retries.
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
}

impl SubmitOutcome {
    /// True for outcomes that leave the record in the outbox.
    pub fn is_transient(&self) -> bool {
        matches!(self, SubmitOutcome::Unavailable { .. })
    }
}

/// Transport trait for record submission.
pub trait Submitter: Send + Sync {
    /// Submit one payload to the remote endpoint.
    fn submit<'a>(
        &'a self,
        payload: &'a Value,
    ) -> Pin<Box<dyn Future<Output = SubmitOutcome> + Send + 'a>>;
}

/// HTTP submitter POSTing JSON to the verification endpoint.
pub struct HttpSubmitter {
    /// Shared HTTP client with the configured request timeout.
    client: reqwest::Client,
    /// Full URL of the submission endpoint.
    url: String,
}

impl HttpSubmitter {
    /// Create a submitter for the given endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpSubmitter {
            client,
            url: url.into(),
        })
    }
}

impl Submitter for HttpSubmitter {
    fn submit<'a>(
        &'a self,
        payload: &'a Value,
    ) -> Pin<Box<dyn Future<Output = SubmitOutcome> + Send + 'a>> {
        Box::pin(async move {
            let response = match self.client.post(&self.url).json(payload).send().await {
                Ok(response) => response,
                Err(e) => {
                    return SubmitOutcome::Unavailable {
                        reason: e.to_string(),
                    }
                }
            };

            let status = response.status();
            if status.is_success() {
                SubmitOutcome::Accepted
            } else if status.is_client_error() {
                let message = response.text().await.unwrap_or_default();
                SubmitOutcome::Rejected {
                    status: status.as_u16(),
                    message,
                }
            } else {
                SubmitOutcome::Unavailable {
                    reason: format!("HTTP {}", status),
                }
            }
        })
    }
}
