// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agent configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing file or an
//! empty table yields a working local-development setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stream::StreamConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the holo agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Submission endpoint for staged records.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Push stream endpoint.
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
    /// Path of the outbox database.
    #[serde(default = "default_queue_path")]
    pub queue_path: PathBuf,
    /// Fixed delay between stream reconnect attempts, in seconds (default 3).
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Live event history size (default 50).
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Periodic drain interval in seconds. 0 = drain only on online
    /// transitions (default 0).
    #[serde(default)]
    pub drain_interval_secs: u64,
    /// HTTP request timeout for submissions, in seconds (default 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8000/api/attendance/verify".to_string()
}

fn default_stream_url() -> String {
    "ws://localhost:8000/api/stream".to_string()
}

fn default_queue_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("holo")
        .join("attendance_queue.db")
}

fn default_reconnect_delay_secs() -> u64 {
    3
}

fn default_buffer_capacity() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            server_url: default_server_url(),
            stream_url: default_stream_url(),
            queue_path: default_queue_path(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            buffer_capacity: default_buffer_capacity(),
            drain_interval_secs: 0,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(AgentConfig::default())
        }
    }

    /// Stream reconnect delay as a duration.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    /// Submission request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Periodic drain interval; `None` when disabled.
    pub fn drain_interval(&self) -> Option<Duration> {
        if self.drain_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.drain_interval_secs))
        }
    }

    /// Derive the live stream configuration.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            url: self.stream_url.clone(),
            reconnect_delay: self.reconnect_delay(),
            capacity: self.buffer_capacity,
        }
    }
}
