// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! holo-core - shared data model for the holo attendance client.
//!
//! This crate defines the types that cross component boundaries:
//!
//! - [`StagedRecord`] - a submission staged in the durable outbox
//! - [`LiveEvent`] / [`EventKind`] / [`StreamFrame`] - the live push stream model
//!
//! The types here are deliberately free of I/O; storage and transport live in
//! `holo-client`.

pub mod event;
pub mod record;

pub use event::{EventKind, LiveEvent, StreamFrame};
pub use record::StagedRecord;
